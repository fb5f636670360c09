//! 401 recovery against a mock platform.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::join_all;
use gptzator_client::{
    ApiError, ErrorKind, GptzatorClient, InMemoryTokenStorage, TokenRefresher, Tokens,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_url(server: &MockServer) -> String {
    format!("{}/api/", server.uri())
}

fn stale_tokens() -> InMemoryTokenStorage {
    InMemoryTokenStorage::with_tokens(Tokens::new("old").with_refresh_token("refresh-1"))
}

/// Refresher that counts calls and takes `delay` to answer.
fn counting_refresher(calls: Arc<AtomicUsize>, delay: Duration) -> impl TokenRefresher {
    move |refresh_token: String| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            assert_eq!(refresh_token, "refresh-1");
            Ok::<_, ApiError>(Tokens::new("new").with_refresh_token("refresh-2"))
        }
    }
}

fn counting_hook(calls: Arc<AtomicUsize>) -> impl Fn() -> futures::future::Ready<()> + Send + Sync {
    move || {
        calls.fetch_add(1, Ordering::SeqCst);
        futures::future::ready(())
    }
}

async fn mount_project(server: &MockServer, token: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "generating": false}))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({"message": "jwt expired"}))
    };
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    mount_project(&server, "abc", 200).await;

    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .tokens(Tokens::new("abc"))
        .build()
        .unwrap();

    let project = client.projects().get("p1").await.unwrap();
    assert_eq!(project.id, "p1");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    mount_project(&server, "old", 401).await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .and(header("authorization", "Bearer new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "p1", "generating": false})),
        )
        .expect(5)
        .mount(&server)
        .await;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(counting_refresher(
            refreshes.clone(),
            Duration::from_millis(300),
        ))
        .build()
        .unwrap();

    let projects = client.projects();
    let results = join_all((0..5).map(|_| projects.get("p1"))).await;

    for result in results {
        assert_eq!(result.unwrap().id, "p1");
    }
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(
        client.tokens(),
        Some(Tokens::new("new").with_refresh_token("refresh-2"))
    );
}

#[tokio::test]
async fn test_second_401_gives_up_and_runs_hook() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(2)
        .mount(&server)
        .await;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let hooks = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(counting_refresher(refreshes.clone(), Duration::ZERO))
        .on_auth_failed(counting_hook(hooks.clone()))
        .build()
        .unwrap();

    let err = client.projects().get("p1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "[ProjectsApi.get] jwt expired");
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(hooks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh() {
    let server = MockServer::start().await;
    mount_project(&server, "old", 401).await;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let hooks = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .tokens(Tokens::new("old"))
        .refresher(counting_refresher(refreshes.clone(), Duration::ZERO))
        .on_auth_failed(counting_hook(hooks.clone()))
        .build()
        .unwrap();

    let err = client.projects().get("p1").await.unwrap_err();

    assert!(err.is_auth_error());
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
    assert_eq!(hooks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_refresh_reports_original_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;

    let hooks = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(|_refresh: String| async {
            Err::<Tokens, _>(ApiError::local("refresh denied"))
        })
        .on_auth_failed(counting_hook(hooks.clone()))
        .build()
        .unwrap();

    let err = client.projects().get("p1").await.unwrap_err();

    assert_eq!(err.message, "[ProjectsApi.get] jwt expired");
    assert_eq!(err.status, Some(401));
    assert_eq!(err.data, Some(json!({"message": "jwt expired"})));
    assert_eq!(hooks.load(Ordering::SeqCst), 1);
    // Tokens are left for the hook to deal with
    assert_eq!(client.tokens().unwrap().access_token, "old");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_401s_with_failing_refresh_all_settle() {
    let server = MockServer::start().await;
    mount_project(&server, "old", 401).await;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let hooks = Arc::new(AtomicUsize::new(0));
    let calls = refreshes.clone();
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(move |_refresh: String| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(300)).await;
                Err::<Tokens, _>(ApiError::local("refresh denied"))
            }
        })
        .on_auth_failed(counting_hook(hooks.clone()))
        .build()
        .unwrap();

    let projects = client.projects();
    let results = tokio::time::timeout(
        Duration::from_secs(5),
        join_all((0..5).map(|_| projects.get("p1"))),
    )
    .await
    .expect("queued requests were never released");

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.status, Some(401));
    }
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    // The refresher gives up once; each released waiter retries once and gives up
    assert_eq!(hooks.load(Ordering::SeqCst), 5);
    let hits = server.received_requests().await.unwrap().len();
    assert!(hits <= 10, "expected at most two attempts per request, got {}", hits);
}

#[tokio::test]
async fn test_refresh_can_run_again_after_failure() {
    let server = MockServer::start().await;
    mount_project(&server, "old", 401).await;
    mount_project(&server, "new", 200).await;

    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(move |_refresh: String| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(ApiError::local("refresh service down"))
                } else {
                    Ok(Tokens::new("new"))
                }
            }
        })
        .build()
        .unwrap();

    assert!(client.projects().get("p1").await.is_err());
    assert!(client.projects().get("p1").await.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_non_401_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .expect(1)
        .mount(&server)
        .await;

    let refreshes = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .refresher(counting_refresher(refreshes.clone(), Duration::ZERO))
        .build()
        .unwrap();

    let err = client.projects().get("p1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Transport);
    assert!(err.is_server_error());
    assert_eq!(err.message, "[ProjectsApi.get] boom");
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_401_without_refresher_is_passed_through() {
    let server = MockServer::start().await;
    mount_project(&server, "old", 401).await;

    let hooks = Arc::new(AtomicUsize::new(0));
    let client = GptzatorClient::builder()
        .base_url(api_url(&server))
        .token_storage(stale_tokens())
        .on_auth_failed(counting_hook(hooks.clone()))
        .build()
        .unwrap();

    let err = client.projects().get("p1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Auth);
    assert_eq!(hooks.load(Ordering::SeqCst), 0);
}
