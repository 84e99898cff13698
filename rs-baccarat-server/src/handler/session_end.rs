use axum::{extract::State, Json};
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
pub struct SessionEndRequest {
    pub session_id: SessionId,
}

/// Final state of a shoe whose ledger has been dropped.
#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct SessionEndedResponse {
    pub session_id: SessionId,
    pub round_count: u32,
    pub used_cards: usize,
}

async fn session_end_handler(
    State(state): State<ServerState>,
    Json(payload): Json<SessionEndRequest>,
) -> HandlerResponse<SessionEndedResponse> {
    Json(end_session(&state, payload.session_id))
}

fn end_session(
    state: &ServerState,
    session_id: SessionId,
) -> Result<SessionEndedResponse, ServerError> {
    let session = state
        .sessions()?
        .remove(&session_id)
        .ok_or_else(|| ServerError::SessionNotFound(session_id.clone()))?;
    event!(
        Level::INFO,
        session = %session_id,
        rounds = session.round_count(),
        "Shoe session ended"
    );
    Ok(SessionEndedResponse {
        session_id,
        round_count: session.round_count(),
        used_cards: session.used_cards().len(),
    })
}

define_handler!(
    SessionEndHandler {
        Request = SessionEndRequest;
        Response = SessionEndedResponse;
        Method = POST;
        Path = "/session_end";
        FN = session_end_handler;
    }
);

impl BaccaratClient {
    pub async fn end_session(
        &self,
        request: SessionEndRequest,
    ) -> ClientResult<SessionEndedResponse> {
        self.query::<SessionEndHandler>(request).await
    }
}
