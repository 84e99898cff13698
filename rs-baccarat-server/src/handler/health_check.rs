use axum::{
    extract::{Query, State},
    Json,
};
use rs_baccarat::config::SimulationConfig;

use crate::{
    baccarat_client::{BaccaratClient, ClientResult},
    baccarat_server::ServerState,
    define_handler,
    error::ServerError,
    handler::HandlerResponse,
};

#[derive(serde::Serialize, serde::Deserialize)]
pub struct HealthCheckRequest {
    pub id: String,
}

/// Liveness plus what the server is currently running with.
#[derive(serde::Deserialize, serde::Serialize)]
pub struct HealthCheckResponse {
    pub id: String,
    pub status: String,
    /// Shoes currently being tracked.
    pub open_sessions: usize,
    /// Settings used when a request does not override them.
    pub config: SimulationConfig,
}

async fn health_check_handler(
    State(state): State<ServerState>,
    Query(params): Query<HealthCheckRequest>,
) -> HandlerResponse<HealthCheckResponse> {
    Json(health_check(&state, params))
}

fn health_check(
    state: &ServerState,
    params: HealthCheckRequest,
) -> Result<HealthCheckResponse, ServerError> {
    let open_sessions = state.sessions()?.len();
    Ok(HealthCheckResponse {
        id: params.id,
        status: "ok".to_string(),
        open_sessions,
        config: state.config.as_ref().clone(),
    })
}

define_handler!(
    HealthCheckHandler {
        Request = HealthCheckRequest;
        Response = HealthCheckResponse;
        Method = GET;
        Path = "/health_check";
        FN = health_check_handler;
    }
);

impl BaccaratClient {
    pub async fn health_check(
        &self,
        request: HealthCheckRequest,
    ) -> ClientResult<HealthCheckResponse> {
        self.query::<HealthCheckHandler>(request).await
    }
}
