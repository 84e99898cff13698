use axum::{extract::State, Json};
use rs_baccarat::{
    baccarat::BaccaratReport,
    core::{card_values, Shoe},
};
use tracing::{event, Level};

use crate::{
    baccarat_client::{BaccaratClient, ClientResult},
    baccarat_server::ServerState,
    define_handler,
    error::ServerError,
    handler::{
        simulate::{request_config, run_analysis},
        HandlerResponse,
    },
};

/// One off analysis of a fresh shoe minus `cards`, with no session.
#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct AnalyzeRequest {
    pub cards: Vec<i64>,
    pub num_decks: Option<u8>,
    pub simulations_per_round: Option<usize>,
    pub rounds: Option<usize>,
}

async fn analyze_handler(
    State(state): State<ServerState>,
    Json(payload): Json<AnalyzeRequest>,
) -> HandlerResponse<BaccaratReport> {
    Json(analyze(state, payload).await)
}

async fn analyze(
    state: ServerState,
    payload: AnalyzeRequest,
) -> Result<BaccaratReport, ServerError> {
    let config = request_config(&state, payload.simulations_per_round, payload.rounds)?;
    let num_decks = payload.num_decks.unwrap_or(state.config.num_decks);
    let shoe = card_values(&payload.cards)
        .and_then(|cards| Shoe::new(num_decks).remove_known(&cards))
        .map_err(|e| {
            event!(Level::WARN, error = %e, "Rejected cards");
            e
        })?;
    event!(
        Level::INFO,
        num_decks,
        used = payload.cards.len(),
        remaining = shoe.len(),
        "Analyze request"
    );

    run_analysis(shoe, config).await
}

define_handler!(
    AnalyzeHandler {
        Request = AnalyzeRequest;
        Response = BaccaratReport;
        Method = POST;
        Path = "/analyze";
        FN = analyze_handler;
    }
);

impl BaccaratClient {
    pub async fn analyze(&self, request: AnalyzeRequest) -> ClientResult<BaccaratReport> {
        self.query::<AnalyzeHandler>(request).await
    }
}
