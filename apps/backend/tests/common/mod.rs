//! Common test utilities and fixtures for integration tests.
//!
//! The service is stateless, so every test builds its own router with the
//! default configuration and drives it through `axum-test`.

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;

use markdeck_backend::config::Config;
use markdeck_backend::{router, AppState};

/// Test context holding the router under test.
pub struct TestContext {
    app: Router,
}

impl TestContext {
    /// Create a context with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a context with a custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            app: router(AppState::new(config)),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Start a test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }
}
