//! Shared test utilities and fixtures for FitMatch integration tests.

pub use fitmatch_core::domain::{Athlete, Experience, Gender, Matching, MatchingStatus, WorkoutDay};
pub use fitmatch_core::DomainEvent;

/// Mock repository implementations
pub mod mocks;
pub use mocks::{FakeBillingProvider, MockRepositories};

/// Event testing utilities
pub mod events {
    use fitmatch_core::{DomainEvent, EventReceiver};
    use std::time::Duration;

    /// Collect events until `timeout` passes without a new one
    pub async fn collect_events(rx: &mut EventReceiver, timeout: Duration) -> Vec<DomainEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = tokio::time::timeout(timeout, rx.recv()).await {
            events.push(event);
        }
        events
    }
}

/// Route service logs through the test harness; filter with RUST_LOG
pub mod logging {
    use tracing_subscriber::EnvFilter;

    pub fn init() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Test fixture utilities
pub mod fixtures {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    /// Password used by every fixture athlete
    pub const PASSWORD: &str = "correct-horse-battery";

    /// An athlete entity with an unusable password hash
    pub fn test_athlete(email: &str) -> Athlete {
        Athlete::new(
            "Test",
            "Athlete",
            email,
            "",
            Gender::Other,
            NaiveDate::from_ymd_opt(1992, 4, 12).unwrap(),
            Experience::Intermediate,
            vec![WorkoutDay::Monday, WorkoutDay::Thursday],
        )
    }

    /// `POST /athletes` body
    pub fn registration_body(email: &str) -> Value {
        json!({
            "name": "Ana",
            "surname": "Lift",
            "email": email,
            "password": PASSWORD,
            "gender": "FEMALE",
            "birthDate": "1994-02-17",
            "trainingExperience": "ADVANCED",
            "trainingDays": ["MONDAY", "FRIDAY"]
        })
    }
}

/// Database test helpers
pub mod db {
    use fitmatch_storage::Database;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    const DB_FILE: &str = "fitmatch.db";

    /// Temporary on-disk database, removed on drop
    pub struct TestDatabase {
        pub db: Database,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DB_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db,
                db_path,
                _temp_dir: temp_dir,
            }
        }

        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Shared in-memory database as the repositories expect it
    pub fn shared_in_memory() -> Arc<Mutex<Database>> {
        Arc::new(Mutex::new(
            Database::open_in_memory().expect("Failed to open in-memory database"),
        ))
    }
}

/// In-process HTTP helpers
pub mod http {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use fitmatch_core::MatchingOptions;
    use fitmatch_gateway::{
        BillingSetup, DependenciesBuilder, GatewayConfig, GatewayServer, ServiceContainer,
        TokenSecret,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub const TOKEN_PASSPHRASE: &str = "integration-test-secret";

    /// Router over a fresh in-memory SQLite database
    pub struct TestApp {
        pub router: Router,
        pub services: Arc<ServiceContainer>,
    }

    impl TestApp {
        pub fn new(billing: BillingSetup) -> Self {
            Self::with_options(billing, MatchingOptions::default())
        }

        pub fn with_options(billing: BillingSetup, options: MatchingOptions) -> Self {
            let mut builder = DependenciesBuilder::new()
                .with_database(super::db::shared_in_memory())
                .with_matching_options(options);
            builder = match billing {
                BillingSetup::Stripe(config) => builder.with_stripe(config),
                BillingSetup::Provider(provider) => builder.with_billing_provider(provider),
            };
            Self::from_builder(builder)
        }

        /// Router over caller-supplied repositories; the token secret is fixed
        pub fn from_builder(builder: DependenciesBuilder) -> Self {
            super::logging::init();
            let deps = builder
                .with_token_secret(TokenSecret::from_passphrase(TOKEN_PASSPHRASE))
                .build()
                .expect("dependencies");

            let server = GatewayServer::new(GatewayConfig::default(), deps).expect("server");
            Self {
                router: server.build_router(),
                services: server.services(),
            }
        }

        /// Send a request; `token` becomes a Bearer header
        pub async fn request(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .expect("request");

            self.send(request).await
        }

        pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.expect("response");
            let status = response.status();
            let bytes = response
                .into_body()
                .collect()
                .await
                .expect("body")
                .to_bytes();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or(Value::Null)
            };
            (status, json)
        }

        /// Register an athlete and log in, returning (id, token)
        pub async fn signup(&self, email: &str) -> (String, String) {
            let (status, athlete) = self
                .request(
                    Method::POST,
                    "/athletes",
                    None,
                    Some(super::fixtures::registration_body(email)),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "register {}: {}", email, athlete);

            let (status, login) = self
                .request(
                    Method::POST,
                    "/login",
                    None,
                    Some(serde_json::json!({ "email": email, "password": super::fixtures::PASSWORD })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "login {}: {}", email, login);

            (
                athlete["id"].as_str().expect("id").to_string(),
                login["access_token"].as_str().expect("token").to_string(),
            )
        }
    }
}
