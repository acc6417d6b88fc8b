use chrono::{Duration, SecondsFormat, Utc};
use clap::Parser;
use httpmock::prelude::*;
use kanban_activity::ActivityGroup;
use kanban_cli::{run_report, write_report_outputs, Cli};
use serde_json::json;

fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn cli_for(server: &MockServer, extra: &[&str]) -> Cli {
    let base_url = server.base_url();
    let mut args = vec![
        "kanban-report",
        "--github-repo",
        "owner/repo",
        "--github-token",
        "test-token",
        "--github-api-base",
        base_url.as_str(),
        "--days",
        "7",
        "--project-numbers",
        "all",
        "--retry-max-attempts",
        "1",
        "--retry-base-delay-ms",
        "1",
    ];
    args.extend_from_slice(extra);
    Cli::try_parse_from(args).expect("cli")
}

fn mock_single_project_board(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/projects");
        then.status(200).json_body(json!([{
            "id": 500,
            "number": 1,
            "name": "Roadmap",
            "html_url": "https://github.com/owner/repo/projects/1"
        }]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/500/columns");
        then.status(200).json_body(json!([
            {"id": 1, "name": "Backlog"},
            {"id": 2, "name": "Done"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/projects/columns/1/cards");
        then.status(200).json_body(json!([]));
    });
}

fn mock_issue(server: &MockServer, issue_number: u64, title: &str, events: serde_json::Value) {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/repos/owner/repo/issues/{issue_number}/events"));
        then.status(200).json_body(events);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/repos/owner/repo/issues/{issue_number}"));
        then.status(200).json_body(json!({
            "number": issue_number,
            "html_url": format!("https://github.com/owner/repo/issues/{issue_number}"),
            "title": title
        }));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/repos/owner/repo/issues/{issue_number}/comments"));
        then.status(200).json_body(json!([]));
    });
}

#[tokio::test]
async fn integration_closed_card_renders_in_closed_grouping() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues");
        then.status(200).json_body(json!([]));
    });
    mock_single_project_board(&server);
    server.mock(|when, then| {
        when.method(GET).path("/projects/columns/2/cards");
        then.status(200).json_body(json!([
            {"id": 20, "content_url": format!("{}/repos/owner/repo/issues/7", server.base_url())}
        ]));
    });
    mock_issue(
        &server,
        7,
        "Ship it",
        json!([{"event": "closed", "created_at": days_ago(2)}]),
    );

    let cli = cli_for(&server, &[]);
    let report = run_report(&cli).await.expect("report");
    assert_eq!(report.projects.len(), 1);
    assert_eq!(
        report.projects[0].columns[1].issues[0].group(),
        ActivityGroup::Closed
    );

    let temp = tempfile::tempdir().expect("tempdir");
    let html_path = temp.path().join("kanban").join("index.html");
    let mut stdout = Vec::new();
    write_report_outputs(&report, &html_path, None, &mut stdout).expect("write");
    let html = std::fs::read_to_string(&html_path).expect("read html");

    assert!(html.contains(
        r#"<td><div class="column">Backlog</div><div style="text-align:center;">No issues</div></td>"#
    ));
    assert!(html.contains(concat!(
        r#"<br/><div class="grouping4"><div class="grouphead">Closed</div>"#,
        r#"<li><a title="closed" href="https://github.com/owner/repo/issues/7" class="group4">Ship it</a> </li>"#,
        r#"</div></td>"#,
    )));
    assert!(html.contains("past 7 days activity (as at "));
}

#[tokio::test]
async fn integration_removed_issues_and_failing_cards_are_isolated() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues");
        then.status(200).json_body(json!([
            {"number": 30, "html_url": "https://github.com/owner/repo/issues/30", "title": "Dropped scope"},
            {"number": 31, "html_url": "https://github.com/owner/repo/issues/31", "title": "Back again"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues/30/events");
        then.status(200).json_body(json!([
            {"event": "added_to_project", "created_at": days_ago(20), "project_card": {"project_id": 500}},
            {"event": "removed_from_project", "created_at": days_ago(12), "project_card": {"project_id": 500}}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues/31/events");
        then.status(200).json_body(json!([
            {"event": "removed_from_project", "created_at": days_ago(12), "project_card": {"project_id": 500}},
            {"event": "added_to_project", "created_at": days_ago(4), "project_card": {"project_id": 500}}
        ]));
    });
    mock_single_project_board(&server);
    server.mock(|when, then| {
        when.method(GET).path("/projects/columns/2/cards");
        then.status(200).json_body(json!([
            {"id": 21, "note": "just a note"},
            {"id": 22, "content_url": "https://api.github.com/repos/owner/repo/issues/8"},
            {"id": 23, "content_url": "https://api.github.com/repos/owner/repo/issues/9"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues/8/events");
        then.status(500).body("boom");
    });
    mock_issue(
        &server,
        9,
        "Moved along",
        json!([{
            "event": "moved_columns_in_project",
            "created_at": days_ago(1),
            "project_card": {"project_id": 500, "column_name": "Done", "previous_column_name": "Backlog"}
        }]),
    );

    let cli = cli_for(&server, &["--project-numbers", "1"]);
    let report = run_report(&cli).await.expect("report");
    let project = &report.projects[0];

    let removed = project
        .removed_issues
        .iter()
        .map(|issue| issue.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(removed, vec!["Dropped scope"]);

    let done = &project.columns[1];
    assert_eq!(done.issues.len(), 1);
    assert_eq!(done.issues[0].snapshot.issue_number, 9);
    assert_eq!(done.issues[0].group(), ActivityGroup::MovedHere);
    assert_eq!(done.issues[0].classification.flow, "Backlog -> Done");

    let html = report.render_html();
    assert!(html.contains(
        r#"<div class="removed"><span class="grouphead">Removed issues</span><br/><a title="" href="https://github.com/owner/repo/issues/30" class="group0">Dropped scope</a></div>"#
    ));
}

#[tokio::test]
async fn regression_project_listing_failure_fails_the_run() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/issues");
        then.status(200).json_body(json!([]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/owner/repo/projects");
        then.status(401).body("Bad credentials");
    });

    let cli = cli_for(&server, &[]);
    let error = run_report(&cli).await.expect_err("should fail");
    let rendered = format!("{error:#}");
    assert!(rendered.contains("failed to build report for owner/repo"));
    assert!(rendered.contains("status 401"));
}
