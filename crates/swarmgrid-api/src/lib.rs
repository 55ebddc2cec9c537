//! swarmgrid-api — REST API for SwarmGrid.
//!
//! Exposes the registry's CRUD entry points over HTTP. Every response body
//! is the registry envelope (`{"message", "code", "data"|"success"}`); the
//! HTTP status mirrors the envelope's error kind.
//!
//! # API Routes
//!
//! | Method | Path | Body / Query | Description |
//! |---|---|---|---|
//! | GET | `/api/v1/swarms` | `?query=all[&checkState=true]` | List swarms |
//! | GET | `/api/v1/swarms` | `?query=active` | Active swarm |
//! | GET | `/api/v1/swarms` | `?query=leader` | Leader of the active swarm |
//! | GET | `/api/v1/swarms` | `?query=<name>` | One swarm |
//! | POST | `/api/v1/swarms` | `{"name", "address"}` | Register a swarm |
//! | DELETE | `/api/v1/swarms` | `{"name"}` | Unregister a swarm |
//! | PUT | `/api/v1/swarms` | `{"name", "setActive": true}` | Activate a swarm |
//! | GET | `/healthz` | | Liveness |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use swarmgrid_registry::SwarmRegistry;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<SwarmRegistry>,
}

/// Build the complete API router.
pub fn build_router(registry: Arc<SwarmRegistry>) -> Router {
    let api_state = ApiState { registry };

    let api_routes = Router::new()
        .route(
            "/swarms",
            get(handlers::query_swarms)
                .post(handlers::add_swarm)
                .delete(handlers::remove_swarm)
                .put(handlers::update_swarm),
        )
        .with_state(api_state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
