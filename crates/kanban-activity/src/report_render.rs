use chrono::{DateTime, Datelike, Utc};

use crate::report_assembly::{ClassifiedIssue, Column, IssueSnapshot, Project};

const REPORT_STYLE: &str = r#"<style>
ul {padding: 12px;}
ul li {list-style-type: circle;}
.removed {align: center; width: 100%; padding: 4px; vertical-align: top; text-align:left;}
.project {overflow-x:auto; text-align: center; }
.projectname {font-size:large; font-weight: bold; }
a.comments {color:purple; font-style: italic; font-size: small; font-weight: bold;}
.grouphead  {font-style: italic; text-align: center; }
.grouping0  {background-color: #f0efef;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.grouping1  {background-color: #ddeedd;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.grouping2  {background-color: #c2d4dd;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.grouping3  {background-color: #eaece5;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.grouping4  {background-color: #b2c2bf;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.grouping5  {background-color: #f0efef;  border-radius: 6px; border: 1px solid #bbbbbb; padding: 8px; }
.column { font-weight: bold; text-align: center; }
table { width: 100%; padding: 4px; border-spacing: 4px;}
td {background-color: #f0efef; width:150px; padding: 8px; vertical-align: top; text-align:left; border: 1px solid #cccccc;  border-radius: 6px;}
</style>"#;

/// Renders projects into the HTML kanban summary.
///
/// Output depends only on the arguments, so two calls with the same report and
/// timestamp produce identical documents.
pub fn render_html_report(projects: &[Project], generated_at: DateTime<Utc>) -> String {
    let as_at = format!(
        "{}/{}/{}",
        generated_at.day(),
        generated_at.month(),
        generated_at.year()
    );
    let body = projects
        .iter()
        .map(|project| render_project(project, &as_at))
        .collect::<String>();
    format!("<html>\n<head>\n{REPORT_STYLE}\n</head>\n<body>\n{body}\n</body>\n</html>\n")
}

fn render_project(project: &Project, as_at: &str) -> String {
    let columns = project.columns.iter().map(render_column).collect::<String>();
    format!(
        "<br/>\n<div class=\"project\"><span class=\"projectname\">\n<a href=\"{url}\">{name}</a>\n</span>\n<br/> past {days} days activity (as at {as_at}){removed}<table><tr>{columns}</tr></table></div><br/>\n",
        url = escape_html(&project.url),
        name = escape_html(&project.name),
        days = project.lookback_days,
        removed = render_removed_issues(&project.removed_issues),
    )
}

fn render_removed_issues(issues: &[IssueSnapshot]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let links = issues
        .iter()
        .map(|issue| {
            format!(
                "<a title=\"\" href=\"{}\" class=\"group0\">{}</a>",
                escape_html(&issue.html_url),
                escape_html(&issue.title)
            )
        })
        .collect::<String>();
    format!(
        "<div class=\"removed\"><span class=\"grouphead\">Removed issues</span><br/>{links}</div>"
    )
}

fn render_column(column: &Column) -> String {
    let body = if column.issues.is_empty() {
        "<div style=\"text-align:center;\">No issues</div>".to_string()
    } else {
        render_column_issues(&column.issues)
    };
    format!(
        "<td><div class=\"column\">{}</div>{body}</td>",
        escape_html(&column.name)
    )
}

/// Wraps each contiguous run of equal groups in its own `grouping{N}` block.
fn render_column_issues(issues: &[ClassifiedIssue]) -> String {
    let mut rendered = String::new();
    let mut previous_group = None;
    for issue in issues {
        let group = issue.group();
        if previous_group != Some(group) {
            if previous_group.is_some() {
                rendered.push_str("</div>");
            }
            rendered.push_str(&format!(
                "<br/><div class=\"grouping{}\"><div class=\"grouphead\">{}</div>",
                group.ordinal(),
                group.label()
            ));
            previous_group = Some(group);
        }
        rendered.push_str(&render_issue(issue));
    }
    if previous_group.is_some() {
        rendered.push_str("</div>");
    }
    rendered
}

fn render_issue(issue: &ClassifiedIssue) -> String {
    let snapshot = &issue.snapshot;
    let url = escape_html(&snapshot.html_url);
    let comments = if snapshot.period_comments > 0 {
        format!(
            " <a class=\"comments\" title=\"{} of {}\" href=\"{url}\">new comments</a>",
            snapshot.period_comments, snapshot.total_comments
        )
    } else {
        String::new()
    };
    format!(
        "<li><a title=\"{flow}\" href=\"{url}\" class=\"group{group}\">{title}</a> {comments}</li>",
        flow = escape_html(&issue.classification.flow),
        group = issue.group().ordinal(),
        title = escape_html(&snapshot.title),
    )
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
