use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use switchboard_core::platform::{PlatformGate, PlatformId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformHealth {
    pub spaces: bool,
    pub catalyst: bool,
    pub meraki: bool,
    pub webex: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub platforms: PlatformHealth,
}

pub fn router(gate: PlatformGate) -> Router {
    Router::new().route("/healthz", get(health)).with_state(gate)
}

pub async fn health(State(gate): State<PlatformGate>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: "switchboard-server",
        platforms: PlatformHealth {
            spaces: gate.is_enabled(PlatformId::Spaces),
            catalyst: gate.is_enabled(PlatformId::Catalyst),
            meraki: gate.is_enabled(PlatformId::Meraki),
            webex: gate.is_enabled(PlatformId::Webex),
        },
    };

    (StatusCode::OK, Json(payload))
}
