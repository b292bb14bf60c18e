#[cfg(test)]
pub mod test_utils {
    use crate::config::{refresh_blacklist, Settings};
    use crate::mail::MemoryMailer;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
    use axum::Router;
    use axum_test::{TestRequest, TestServer};
    use common::{ApiResponse, TokenPair};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::json;
    use std::sync::Arc;
    use tracing::{subscriber::DefaultGuard, Level};
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_PASSWORD: &str = "s3cret-pass";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    pub fn test_settings() -> Settings {
        Settings {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            public_base_url: "http://testserver".to_string(),
            ..Settings::default()
        }
    }

    /// Create AppState for testing, with a mailer the test can inspect
    pub async fn setup_test_app_state() -> (AppState, MemoryMailer) {
        let db = setup_test_db().await;
        let settings = test_settings();
        let mailer = MemoryMailer::new(settings.mail_from.clone());

        let state = AppState {
            db,
            cache: refresh_blacklist(&settings),
            policy: settings.timer_policy(),
            settings: Arc::new(settings),
            mailer: Arc::new(mailer.clone()),
        };
        (state, mailer)
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    pub fn init_test_tracing() -> DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let (router, _, _) = setup_test_app_with_state().await;
        router
    }

    pub async fn setup_test_app_with_state() -> (Router, AppState, MemoryMailer) {
        let (state, mailer) = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state, mailer)
    }

    /// A test server plus handles on its state and outbox.
    pub struct TestApp {
        pub server: TestServer,
        pub state: AppState,
        pub mailer: MemoryMailer,
        // Keeps the test subscriber installed for the test's lifetime.
        _tracing: DefaultGuard,
    }

    impl TestApp {
        pub async fn new() -> Self {
            let tracing = init_test_tracing();
            let (router, state, mailer) = setup_test_app_with_state().await;
            let server = TestServer::new(router).unwrap();
            Self {
                server,
                state,
                mailer,
                _tracing: tracing,
            }
        }

        /// Signs up `username` with `user_type` and returns its tokens.
        pub async fn signup(&self, username: &str, user_type: i32) -> TokenPair {
            let response = self
                .server
                .post("/api/v1/auth/signup")
                .json(&json!({
                    "email": format!("{}@example.com", username),
                    "username": username,
                    "password": TEST_PASSWORD,
                    "first_name": username,
                    "last_name": "Tester",
                    "user_type": user_type,
                }))
                .await;
            response.assert_status(StatusCode::CREATED);
            response.json::<ApiResponse<TokenPair>>().data
        }

        pub async fn staff(&self, username: &str) -> String {
            self.signup(username, 1).await.access_token
        }

        pub async fn photographer(&self, username: &str) -> String {
            self.signup(username, 2).await.access_token
        }

        pub async fn client(&self, username: &str) -> String {
            self.signup(username, 3).await.access_token
        }

        /// The user id behind an access token.
        pub async fn user_id(&self, token: &str) -> i64 {
            let response = bearer(self.server.post("/api/v1/auth/token/verify"), token)
                .json(&json!({ "token": token }))
                .await;
            response.assert_status_ok();
            let body: ApiResponse<String> = response.json();
            body.data.parse().unwrap()
        }
    }

    /// Adds `Authorization: Bearer <token>` to a request.
    pub fn bearer(request: TestRequest, token: &str) -> TestRequest {
        request.add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        )
    }
}
