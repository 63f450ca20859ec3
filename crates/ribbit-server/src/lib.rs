//! ribbit-server - REST API server for ribbit.
//!
//! Exposes reminders, manual digest sends and scheduler state over HTTP,
//! and hosts the periodic digest check.
//!
//! # Example
//!
//! ```ignore
//! use ribbit_core::RibbitConfig;
//! use ribbit_server::{create_server, create_state};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = create_state(RibbitConfig::from_env())?;
//!     let app = create_server(state);
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod factory;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use factory::create_state;
pub use state::AppState;

use axum::{middleware as axum_middleware, Router};
use tower_http::trace::TraceLayer;

/// Create the server with all routes and middleware.
pub fn create_server(state: AppState) -> Router {
    routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
}
