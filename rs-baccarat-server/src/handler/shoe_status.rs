use axum::{
    extract::{Query, State},
    Json,
};
use rs_baccarat::baccarat::{distribution, RankCount, ShoeSession};

use crate::{
    baccarat_client::{BaccaratClient, ClientResult},
    baccarat_server::ServerState,
    define_handler,
    handler::HandlerResponse,
    session_id::SessionId,
};

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct ShoeStatusRequest {
    pub session_id: SessionId,
}

/// The reconstructed shoe of one session.
#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct ShoeStatus {
    pub session_id: SessionId,
    pub num_decks: u8,
    pub round_count: u32,
    pub used_cards: usize,
    pub remaining_cards: usize,
    pub distribution: Vec<RankCount>,
}

impl ShoeStatus {
    pub fn new(session_id: SessionId, session: &ShoeSession) -> Self {
        let shoe = session.remaining_shoe();
        Self {
            session_id,
            num_decks: session.num_decks(),
            round_count: session.round_count(),
            used_cards: session.used_cards().len(),
            remaining_cards: shoe.len(),
            distribution: distribution(&shoe),
        }
    }
}

async fn shoe_status_handler(
    State(state): State<ServerState>,
    Query(params): Query<ShoeStatusRequest>,
) -> HandlerResponse<ShoeStatus> {
    let session_id = params.session_id;
    Json(state.with_session(&session_id, |session| {
        Ok(ShoeStatus::new(session_id.clone(), session))
    }))
}

define_handler!(
    ShoeStatusHandler {
        Request = ShoeStatusRequest;
        Response = ShoeStatus;
        Method = GET;
        Path = "/shoe_status";
        FN = shoe_status_handler;
    }
);

impl BaccaratClient {
    pub async fn shoe_status(&self, request: ShoeStatusRequest) -> ClientResult<ShoeStatus> {
        self.query::<ShoeStatusHandler>(request).await
    }
}
