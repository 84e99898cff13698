use std::time::Duration;

use axum::{extract::State, Json};
use rs_baccarat::{
    baccarat::{analyze, BaccaratReport, CancelToken},
    config::SimulationConfig,
    core::{card_values, Shoe},
};
use tracing::{event, Level};

use crate::{
    baccarat_client::{BaccaratClient, ClientResult},
    baccarat_server::ServerState,
    define_handler,
    error::ServerError,
    handler::HandlerResponse,
    session_id::SessionId,
};

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct SimulateRequest {
    pub session_id: SessionId,
    /// Cards dealt in the round that just finished, 1 (ace) to 13 (king).
    /// Decoded wide so that any out of range number becomes `InvalidCard`.
    pub cards: Vec<i64>,
    pub simulations_per_round: Option<usize>,
    pub rounds: Option<usize>,
}

async fn simulate_handler(
    State(state): State<ServerState>,
    Json(payload): Json<SimulateRequest>,
) -> HandlerResponse<BaccaratReport> {
    Json(simulate(state, payload).await)
}

async fn simulate(
    state: ServerState,
    payload: SimulateRequest,
) -> Result<BaccaratReport, ServerError> {
    let session_id = payload.session_id;
    let config = request_config(&state, payload.simulations_per_round, payload.rounds)?;
    let (round, shoe) = state.with_session(&session_id, |session| {
        let round = card_values(&payload.cards)
            .and_then(|cards| session.deal(&cards))
            .map_err(|e| {
                event!(Level::WARN, session = %session_id, error = %e, "Rejected cards");
                e
            })?;
        Ok((round, session.remaining_shoe()))
    })?;
    event!(
        Level::INFO,
        session = %session_id,
        round,
        dealt = payload.cards.len(),
        remaining = shoe.len(),
        "Simulate request"
    );

    let mut report = run_analysis(shoe, config).await?;
    report.round = Some(round);
    Ok(report)
}

/// The server's configuration with the per request overrides applied.
/// Overrides are held to the same limits as the server's own settings.
pub(crate) fn request_config(
    state: &ServerState,
    simulations_per_round: Option<usize>,
    rounds: Option<usize>,
) -> Result<SimulationConfig, ServerError> {
    let base = state.config.as_ref();
    let config = SimulationConfig {
        simulations_per_round: simulations_per_round.unwrap_or(base.simulations_per_round),
        rounds: rounds.unwrap_or(base.rounds),
        ..base.clone()
    };
    config.validate().map_err(|e| {
        event!(Level::WARN, error = %e, "Rejected simulation settings");
        e
    })?;
    Ok(config)
}

/// Analyze `shoe` on the blocking pool. The session lock is never held
/// here.
pub(crate) async fn run_analysis(
    shoe: Shoe,
    config: SimulationConfig,
) -> Result<BaccaratReport, ServerError> {
    let cancel = match config.timeout_ms {
        Some(ms) => CancelToken::with_timeout(Duration::from_millis(ms)),
        None => CancelToken::new(),
    };
    let report = tokio::task::spawn_blocking(move || {
        analyze(&shoe, &config, rand::rng(), &cancel, &|_| {})
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;

    if !report.result.is_complete() {
        event!(
            Level::WARN,
            played = report.result.total(),
            requested = report.result.requested,
            "Simulation timed out"
        );
    }
    Ok(report)
}

define_handler!(
    SimulateHandler {
        Request = SimulateRequest;
        Response = BaccaratReport;
        Method = POST;
        Path = "/simulate";
        FN = simulate_handler;
    }
);

impl BaccaratClient {
    pub async fn simulate(&self, request: SimulateRequest) -> ClientResult<BaccaratReport> {
        self.query::<SimulateHandler>(request).await
    }
}
