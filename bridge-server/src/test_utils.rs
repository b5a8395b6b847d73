use crate::config::Settings;
use crate::create_app;
use crate::state::AppState;
use crate::webhook::WebhookSink;
use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Access token handed out by [`mount_token_endpoint`]
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Path of the throwaway RSA private key used by tests
pub fn private_key_path() -> PathBuf {
    PathBuf::from(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/fixtures/test_private_key.pem"
    ))
}

/// Public half of the test key, for verifying signed assertions
pub fn public_key_pem() -> &'static [u8] {
    include_bytes!("../fixtures/test_public_key.pem")
}

/// Mount a token endpoint on `login` that issues [`TEST_ACCESS_TOKEN`] for `instance`,
/// expecting exactly `expected_calls` exchanges.
pub async fn mount_token_endpoint(login: &MockServer, instance: &MockServer, expected_calls: u64) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/services/oauth2/token"))
        .and(matchers::body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TEST_ACCESS_TOKEN,
            "instance_url": instance.uri(),
            "token_type": "Bearer",
            "scope": "api",
            "id": format!("{}/id/00Dxx0000000001/005xx0000000001", login.uri()),
            "issued_at": "1700000000000"
        })))
        .expect(expected_calls)
        .mount(login)
        .await;
}

/// Test fixture for exercising the router against mocked Salesforce endpoints.
///
/// `login_mock` plays the authorization server, `instance_mock` the org's REST API.
/// Expectations set with `.expect(n)` are verified when the mock servers are dropped.
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     mount_token_endpoint(&fixture.login_mock, &fixture.instance_mock, 1).await;
///     fixture
///         .add_instance_mock(Method::PATCH, ACCOUNT_PATH, json!({}), StatusCode::NO_CONTENT, 1)
///         .await;
///
///     let response = fixture.post("/sync/account", &json!({"External_Id__c": "EXT-1"})).await;
///     response.assert_status(StatusCode::NO_CONTENT);
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration settings
    pub settings: Settings,
    /// Mock server for the OAuth token endpoint
    pub login_mock: MockServer,
    /// Mock server for the instance REST API
    pub instance_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture that logs webhooks with the default sink
    pub async fn new() -> Self {
        Self::build(None).await
    }

    /// Creates a new test fixture delivering webhooks to `sink`
    pub async fn with_webhook_sink(sink: Arc<dyn WebhookSink>) -> Self {
        Self::build(Some(sink)).await
    }

    async fn build(sink: Option<Arc<dyn WebhookSink>>) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let login_mock = MockServer::start().await;
        let instance_mock = MockServer::start().await;

        let settings = Settings::for_test_with_mocks(&login_mock);
        let mut state = AppState::new(settings.clone()).expect("Failed to create test state");
        if let Some(sink) = sink {
            state = state.with_webhook_sink(sink);
        }
        let app = create_app(state);

        Self {
            app,
            settings,
            login_mock,
            instance_mock,
        }
    }

    /// Initializes the test logger, repeated calls are ignored
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder with a JSON content type
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Content-Type", "application/json")
    }

    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a POST request with a JSON body
    pub async fn post<T: Serialize>(&self, uri: impl AsRef<str>, body: &T) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        self.post_raw(uri, json_body).await
    }

    /// Sends a POST request with the body bytes as given, for malformed payloads
    pub async fn post_raw(&self, uri: impl AsRef<str>, body: impl Into<Body>) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri)
            .body(body.into())
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| json!({}))
        } else {
            json!({})
        };

        TestResponse { status, json }
    }

    /// Mounts a response on the instance REST API mock
    pub async fn add_instance_mock(
        &self,
        method: Method,
        path: impl Into<String>,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method(method.as_str()))
            .and(matchers::path(path.into()))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.instance_mock)
            .await;
    }

    /// Number of requests each mock server has received so far
    pub async fn outbound_calls(&self) -> (usize, usize) {
        let login = self
            .login_mock
            .received_requests()
            .await
            .map_or(0, |requests| requests.len());
        let instance = self
            .instance_mock
            .received_requests()
            .await
            .map_or(0, |requests| requests.len());
        (login, instance)
    }
}

/// Status and JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub json: Value,
}

impl TestResponse {
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_value(self.json.clone()).expect("Failed to deserialize response JSON")
    }
}
