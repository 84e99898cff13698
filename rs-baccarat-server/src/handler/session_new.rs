use axum::{extract::State, Json};
use rs_baccarat::baccarat::ShoeSession;
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
pub struct NewSessionRequest {
    /// Decks in the shoe. The server's configured count when absent.
    pub num_decks: Option<u8>,
}

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct SessionCreatedResponse {
    pub session_id: SessionId,
    pub remaining_cards: usize,
}

async fn new_session_handler(
    State(state): State<ServerState>,
    Json(payload): Json<NewSessionRequest>,
) -> HandlerResponse<SessionCreatedResponse> {
    Json(new_session(&state, payload))
}

fn new_session(
    state: &ServerState,
    payload: NewSessionRequest,
) -> Result<SessionCreatedResponse, ServerError> {
    let num_decks = payload.num_decks.unwrap_or(state.config.num_decks);
    if num_decks == 0 {
        return Err(rs_baccarat::core::BaccaratError::InvalidConfig(
            "num_decks must be at least 1".to_string(),
        )
        .into());
    }

    let session = ShoeSession::new(num_decks);
    let remaining_cards = session.remaining_shoe().len();
    let session_id = SessionId::random();
    state.sessions()?.insert(session_id.clone(), session);
    event!(Level::INFO, session = %session_id, num_decks, "New shoe session");

    Ok(SessionCreatedResponse {
        session_id,
        remaining_cards,
    })
}

define_handler!(
    NewSessionHandler {
        Request = NewSessionRequest;
        Response = SessionCreatedResponse;
        Method = POST;
        Path = "/session_new";
        FN = new_session_handler;
    }
);

impl BaccaratClient {
    pub async fn new_session(
        &self,
        request: NewSessionRequest,
    ) -> ClientResult<SessionCreatedResponse> {
        self.query::<NewSessionHandler>(request).await
    }
}
