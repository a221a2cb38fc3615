use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::health;
use super::keys;
use super::state::AppState;
use super::summarize;
use super::validate;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Key management (session-authenticated)
        .route(
            "/api/keys",
            get(keys::list_api_keys).post(keys::create_api_key),
        )
        .route(
            "/api/keys/{id}",
            put(keys::update_api_key).delete(keys::delete_api_key),
        )
        // Key validation and consumption
        .route("/api/validate", post(validate::validate_api_key))
        .route("/api/github-summarizer", post(summarize::summarize_repository))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::api::middleware::CredentialSources;
    use crate::domain::github::{RepoFetcher, RepoMetadata, RepoRef};
    use crate::domain::summary::{ReadmeSummarizer, RepoSummary};
    use crate::domain::user::User;
    use crate::domain::DomainError;
    use crate::infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository};
    use crate::infrastructure::auth::{JwtConfig, JwtService};
    use crate::infrastructure::user::{InMemoryUserRepository, UserService};

    #[derive(Debug)]
    struct StubFetcher {
        fail_readme: bool,
    }

    #[async_trait]
    impl RepoFetcher for StubFetcher {
        async fn fetch_readme(&self, _repo: &RepoRef) -> Result<String, DomainError> {
            if self.fail_readme {
                Err(DomainError::provider("github", "GitHub API returned 404"))
            } else {
                Ok("# Demo\nA demo repository.".to_string())
            }
        }

        async fn fetch_metadata(&self, _repo: &RepoRef) -> Result<RepoMetadata, DomainError> {
            Ok(RepoMetadata {
                stars: 42,
                latest_version: Some("v1.0.0".to_string()),
                ..Default::default()
            })
        }
    }

    #[derive(Debug)]
    struct StubSummarizer;

    #[async_trait]
    impl ReadmeSummarizer for StubSummarizer {
        async fn summarize(&self, _readme: &str) -> Result<RepoSummary, DomainError> {
            Ok(RepoSummary {
                summary: "A demo repository".to_string(),
                cool_facts: vec!["It is a demo".to_string()],
            })
        }
    }

    fn jwt_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key", 24))
    }

    fn test_app(fail_readme: bool) -> Router {
        let state = AppState::new(
            Arc::new(ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()))),
            Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new()))),
            Arc::new(jwt_service()),
            Arc::new(StubFetcher { fail_readme }),
            Arc::new(StubSummarizer),
            CredentialSources::default(),
        );

        create_router(state)
    }

    fn bearer_token() -> String {
        let user = User::new("alice@example.com", Some("Alice".to_string()));
        jwt_service().generate(&user).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn create_key(app: &Router, token: &str, body: Value) -> Value {
        let (status, body) = send(app, json_request("POST", "/api/keys", Some(token), body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["apiKey"].clone()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app(false);

        let (status, body) = send(
            &app,
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = send(&app, Request::get("/live").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&app, Request::get("/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"][0]["name"], "key_store");
    }

    #[tokio::test]
    async fn test_keys_require_session() {
        let app = test_app(false);

        let (status, body) = send(
            &app,
            Request::get("/api/keys").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
    }

    #[tokio::test]
    async fn test_key_crud_roundtrip() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Production"})).await;
        assert_eq!(created["name"], "Production");
        assert_eq!(created["usage"], 0);
        assert_eq!(created["limit"], 1000);

        let id = created["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request("GET", "/api/keys", Some(&token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["apiKeys"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/keys/{}", id),
                Some(&token),
                json!({"name": "Renamed", "limit": 50}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["apiKey"]["name"], "Renamed");
        assert_eq!(body["apiKey"]["limit"], 50);

        let (status, body) = send(
            &app,
            json_request(
                "DELETE",
                &format!("/api/keys/{}", id),
                Some(&token),
                Value::Null,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API key deleted successfully");
    }

    #[tokio::test]
    async fn test_keys_are_owner_scoped() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Mine"})).await;
        let id = created["id"].as_str().unwrap().to_string();

        let other = User::new("bob@example.com", None);
        let other_token = jwt_service().generate(&other).unwrap();

        let (status, body) = send(
            &app,
            json_request(
                "DELETE",
                &format!("/api/keys/{}", id),
                Some(&other_token),
                Value::Null,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "API key not found or access denied");

        let (status, body) = send(
            &app,
            json_request("GET", "/api/keys", Some(&other_token), Value::Null),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["apiKeys"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validate_contract() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test"})).await;
        let value = created["value"].as_str().unwrap().to_string();

        // Missing credential
        let (status, body) = send(
            &app,
            json_request("POST", "/api/validate", None, json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "API key is required");
        assert_eq!(body["status"], 400);

        // Unknown credential
        let (status, body) = send(
            &app,
            json_request("POST", "/api/validate", None, json!({"apiKey": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid API key");

        // Valid credential, from body
        let (status, body) = send(
            &app,
            json_request("POST", "/api/validate", None, json!({"apiKey": value})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "API key is valid");
        assert_eq!(body["data"]["usage"], 0);

        // Validation never consumes usage
        let (_, body) = send(
            &app,
            json_request("POST", "/api/validate", None, json!({"apiKey": value})),
        )
        .await;
        assert_eq!(body["data"]["usage"], 0);
    }

    #[tokio::test]
    async fn test_validate_accepts_header_credential() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test"})).await;
        let value = created["value"].as_str().unwrap().to_string();

        let request = Request::post("/api/validate")
            .header("x-api-key", &value)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_summarizer_consumes_usage() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test", "limit": 2})).await;
        let value = created["value"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value, "githubUrl": "https://github.com/octocat/hello-world"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "API key is valid and repository summarized");
        assert_eq!(body["data"]["usage"], 1);
        assert_eq!(body["summary"]["summary"], "A demo repository");
        assert_eq!(body["summary"]["stars"], 42);

        // Second call uses the last unit
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value, "githubUrl": "https://github.com/octocat/hello-world"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["usage"], 2);

        // Third call is over the ceiling
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value, "githubUrl": "https://github.com/octocat/hello-world"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["message"], "API key usage limit exceeded");
        assert_eq!(body["status"], 429);
    }

    #[tokio::test]
    async fn test_summarizer_partial_success_still_charges() {
        let app = test_app(true);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test"})).await;
        let value = created["value"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value, "githubUrl": "https://github.com/octocat/hello-world"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "API key is valid but failed to fetch README content"
        );
        assert_eq!(body["data"]["usage"], 1);
        assert!(body["error"].as_str().is_some());
        assert!(body.get("summary").is_none());
    }

    #[tokio::test]
    async fn test_summarizer_without_url_still_consumes() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test"})).await;
        let value = created["value"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API key is valid");
        assert_eq!(body["data"]["usage"], 1);
    }

    #[tokio::test]
    async fn test_summarizer_malformed_url_is_partial_success() {
        let app = test_app(false);
        let token = bearer_token();

        let created = create_key(&app, &token, json!({"name": "Test"})).await;
        let value = created["value"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/github-summarizer",
                None,
                json!({"apiKey": value, "githubUrl": "not-a-github-url"}),
            ),
        )
        .await;

        // The usage unit is charged before the URL is inspected, so a bad
        // URL reports partial success like any other fetch failure.
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "API key is valid but failed to fetch README content"
        );
        assert!(body["error"].is_string());
        assert!(body.get("summary").is_none());
        assert_eq!(body["data"]["usage"], 1);
    }
}
