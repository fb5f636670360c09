//! Resource façades against a mock platform.

use gptzator_client::{
    ErrorKind, GptzatorClient, ListProjectsQuery, ListThreadsQuery, SignupRequest, Tokens,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, GptzatorClient) {
    let server = MockServer::start().await;
    let client = GptzatorClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .build()
        .unwrap();
    (server, client)
}

#[tokio::test]
async fn test_login_stores_tokens() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({"email": "me@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "email": "me@example.com"},
            "token": "t1",
            "refreshToken": "r1"
        })))
        .mount(&server)
        .await;

    let login = client.user().login("me@example.com", "pw").await.unwrap();

    assert_eq!(login.token, "t1");
    assert_eq!(login.user.unwrap().id, "u1");
    assert_eq!(
        client.tokens(),
        Some(Tokens::new("t1").with_refresh_token("r1"))
    );
}

#[tokio::test]
async fn test_login_without_token_is_local_error() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": "u1"}})))
        .mount(&server)
        .await;

    let err = client.user().login("me@example.com", "pw").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Local);
    assert_eq!(err.message, "[UserApi.login] Login failed: token not returned");
    assert!(client.tokens().is_none());
}

#[tokio::test]
async fn test_signup_sends_optional_fields_only_when_set() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(json!({
            "email": "new@example.com",
            "password": "pw",
            "policy": true,
            "phone": "+70000000000"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t2"})))
        .mount(&server)
        .await;

    let request = SignupRequest {
        email: "new@example.com".to_string(),
        password: "pw".to_string(),
        policy: true,
        phone: "+70000000000".to_string(),
        ..Default::default()
    };
    client.user().signup(&request).await.unwrap();

    assert_eq!(client.tokens(), Some(Tokens::new("t2")));
}

#[tokio::test]
async fn test_logout_clears_tokens_even_on_failure() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    client.set_tokens(Some(Tokens::new("t1")));
    let err = client.user().logout().await.unwrap_err();

    assert_eq!(err.status, Some(500));
    assert_eq!(err.message, "[UserApi.logout] Request failed with status code 500");
    assert!(client.tokens().is_none());
}

#[tokio::test]
async fn test_error_body_message_is_prefixed() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/missing"))
        .and(query_param("depth", "0"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"errors": [{"message": "The requested resource was not found."}]})),
        )
        .mount(&server)
        .await;

    let err = client.apps().get("missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err.message,
        "[AppsApi.get] The requested resource was not found."
    );
    assert!(err.data.is_some());
}

#[tokio::test]
async fn test_undecodable_body_is_local_error() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client.projects().get("p1").await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Local);
    assert_eq!(err.status, None);
    assert!(err.message.starts_with("[ProjectsApi.get] "));
}

#[tokio::test]
async fn test_project_list_filters() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("where[name][contains]", "bakery"))
        .and(query_param("limit", "20"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "p1", "name": "bakery site"}],
            "totalDocs": 21,
            "page": 2,
            "hasNextPage": false
        })))
        .mount(&server)
        .await;

    let page = client
        .projects()
        .list(ListProjectsQuery {
            search: Some("bakery".to_string()),
            page: Some(2),
        })
        .await
        .unwrap();

    assert_eq!(page.total_docs, 21);
    assert_eq!(page.docs[0].name, "bakery site");
}

#[tokio::test]
async fn test_generate_selects_trigger_variant() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/projects/p1/generateBlocks"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/projects/p1/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "a1", "name": "Text"}])))
        .expect(1)
        .mount(&server)
        .await;

    let blocks = client.projects().generate("p1", true).await.unwrap();
    assert!(blocks.is_empty());

    let single = client.projects().generate("p1", false).await.unwrap();
    assert_eq!(single[0].id, "a1");
}

#[tokio::test]
async fn test_delete_uses_where_filter() {
    let (server, client) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects"))
        .and(query_param("where[id][equals]", "p1"))
        .and(query_param("depth", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"docs": []})))
        .expect(1)
        .mount(&server)
        .await;

    client.projects().delete("p1").await.unwrap();
}

#[tokio::test]
async fn test_vault_favourite_toggle() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users/me/favorites/vaults/v1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/me/favorites/vaults/v1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.vaults().set_favourite("v1", true).await.unwrap();
    client.vaults().set_favourite("v1", false).await.unwrap();
}

#[tokio::test]
async fn test_get_many_vaults_uses_in_filter() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/vaults"))
        .and(query_param("where[id][in][0]", "v1"))
        .and(query_param("where[id][in][1]", "v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "v1", "name": "Docs"}, {"id": "v2", "name": "FAQ"}],
            "totalDocs": 2
        })))
        .mount(&server)
        .await;

    let vaults = client
        .vaults()
        .get_many(&["v1".to_string(), "v2".to_string()])
        .await
        .unwrap();
    assert_eq!(vaults.docs.len(), 2);
}

#[tokio::test]
async fn test_avatar_upload_is_multipart() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/users_avatars"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "doc": {"id": "av1", "url": "https://cdn/av1.png"}
        })))
        .mount(&server)
        .await;

    let avatar = client
        .user()
        .upload_avatar("me.png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert_eq!(avatar.id, "av1");
}

#[tokio::test]
async fn test_threads_list_passes_params() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/threads"))
        .and(query_param("search", "draft"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "t1", "title": "draft notes", "status": "wait"}],
            "totalDocs": 1
        })))
        .mount(&server)
        .await;

    let threads = client
        .threads()
        .list(ListThreadsQuery {
            search: Some("draft".to_string()),
            page: None,
        })
        .await
        .unwrap();
    assert_eq!(threads.docs[0].status.as_deref(), Some("wait"));
}

#[tokio::test]
async fn test_models_unwrap_docs() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .and(query_param("where[active][equals]", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "docs": [{"id": "m1", "name": "GPT-4o", "codeId": "gpt-4o", "vendor": "openai", "active": true}]
        })))
        .mount(&server)
        .await;

    let models = client.models().list_active().await.unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].code_id, "gpt-4o");
}
