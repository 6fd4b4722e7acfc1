//! GithubClient against a mocked GitHub REST API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use statusgate_core::fakes::RecordingSink;
use statusgate_core::{
    AggregateStatus, FetchError, GateError, IgnoreRule, PollConfig, PollOutcome, Poller,
    Repository, StatusSource,
};
use statusgate_github::{GithubClient, GithubConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATUSES_PATH: &str = "/repos/stevedores-org/statusgate/commits/abc123/statuses";
const CHECK_RUNS_PATH: &str = "/repos/stevedores-org/statusgate/commits/abc123/check-runs";

fn github_config(server: &MockServer) -> GithubConfig {
    let repository = Repository::parse("stevedores-org/statusgate").unwrap();
    GithubConfig::new(&server.uri(), repository, "test-token")
}

fn client(server: &MockServer) -> GithubClient {
    GithubClient::new(github_config(server)).unwrap()
}

fn statuses_page(page: u32, count: usize) -> serde_json::Value {
    let statuses: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "context": format!("ctx-{}-{}", page, i),
                "state": "success",
                "updated_at": "2026-01-01T00:00:00Z",
                "target_url": null
            })
        })
        .collect();
    serde_json::Value::Array(statuses)
}

fn failing_lint_runs() -> serde_json::Value {
    json!({
        "total_count": 2,
        "check_runs": [
            {
                "name": "build",
                "status": "completed",
                "conclusion": "success",
                "started_at": "2026-01-01T00:00:00Z",
                "completed_at": "2026-01-01T00:10:00Z",
                "html_url": "https://github.com/stevedores-org/statusgate/runs/1",
                "check_suite": { "id": 1 }
            },
            {
                "name": "lint",
                "status": "completed",
                "conclusion": "failure",
                "started_at": "2026-01-01T00:00:00Z",
                "completed_at": "2026-01-01T00:02:00Z",
                "html_url": "https://github.com/stevedores-org/statusgate/runs/2",
                "check_suite": { "id": 1 }
            }
        ]
    })
}

/// Mount a failing lint run and no commit statuses.
async fn mount_failing_lint(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CHECK_RUNS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(failing_lint_runs()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn mount_unauthorized(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn requests_carry_auth_and_api_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses_page(1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let reports = client(&server)
        .fetch_commit_statuses("abc123")
        .await
        .expect("fetch failed");

    assert_eq!(reports.len(), 1);
}

#[tokio::test]
async fn commit_statuses_follow_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses_page(1, 100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses_page(2, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let reports = client(&server)
        .fetch_commit_statuses("abc123")
        .await
        .expect("fetch failed");

    assert_eq!(reports.len(), 101);
    assert_eq!(reports[0].name, "ctx-1-0");
    assert_eq!(reports[100].name, "ctx-2-0");
}

#[tokio::test]
async fn listing_past_the_page_limit_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(statuses_page(1, 100)))
        .expect(2)
        .mount(&server)
        .await;

    let client = GithubClient::new(github_config(&server).with_max_pages(2)).unwrap();
    let err = client.fetch_commit_statuses("abc123").await.unwrap_err();

    match err {
        FetchError::Truncated { url, pages } => {
            assert_eq!(pages, 2);
            assert!(url.ends_with(STATUSES_PATH));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn check_runs_stop_at_total_count() {
    let server = MockServer::start().await;
    let runs: Vec<_> = (0..100)
        .map(|i| {
            json!({
                "name": format!("job-{}", i),
                "status": "completed",
                "conclusion": "success",
                "completed_at": "2026-01-01T00:10:00Z",
                "check_suite": { "id": 1 }
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(CHECK_RUNS_PATH))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "total_count": 100, "check_runs": runs })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let checks = client(&server)
        .fetch_check_runs("abc123")
        .await
        .expect("fetch failed");

    assert_eq!(checks.len(), 100);
}

#[tokio::test]
async fn check_runs_map_conclusion_and_suite() {
    let server = MockServer::start().await;
    mount_failing_lint(&server).await;

    let checks = client(&server)
        .fetch_check_runs("abc123")
        .await
        .expect("fetch failed");

    assert_eq!(checks.len(), 2);
    assert_eq!(checks[1].report.name, "lint");
    assert_eq!(checks[1].report.state, "failure");
    assert_eq!(checks[1].suite_id, 1);
}

#[tokio::test]
async fn http_error_is_a_status_error() {
    let server = MockServer::start().await;
    mount_unauthorized(&server).await;

    let err = client(&server).fetch_check_runs("abc123").await.unwrap_err();

    match err {
        FetchError::Status { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("Bad credentials"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(STATUSES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_commit_statuses("abc123")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn poller_fails_fast_on_failed_check() {
    let server = MockServer::start().await;
    mount_failing_lint(&server).await;

    let sink = Arc::new(RecordingSink::new());
    let poller = Poller::new(
        Arc::new(client(&server)),
        sink.clone(),
        IgnoreRule::Nothing,
        PollConfig {
            check_interval: Duration::from_secs(10),
            max_attempts: 1000,
        },
    );

    let result = poller.run("abc123").await.expect("poll failed");

    assert!(!result.success);
    assert_eq!(result.outcome, PollOutcome::Failed);
    assert_eq!(result.attempts, 1);
    assert_eq!(result.checks, AggregateStatus::Failure);
    assert_eq!(result.statuses, AggregateStatus::Success);
}

#[tokio::test]
async fn poller_propagates_auth_failure() {
    let server = MockServer::start().await;
    mount_unauthorized(&server).await;

    let poller = Poller::new(
        Arc::new(client(&server)),
        Arc::new(RecordingSink::new()),
        IgnoreRule::Nothing,
        PollConfig::default(),
    );

    let err = poller.run("abc123").await.unwrap_err();
    assert!(matches!(err, GateError::Fetch(FetchError::Status { status: 401, .. })));
}
