use axum::{extract::State, Json};
use tracing::{event, Level};

use crate::{
    baccarat_client::{BaccaratClient, ClientResult},
    baccarat_server::ServerState,
    define_handler,
    handler::{shoe_status::ShoeStatus, HandlerResponse},
    session_id::SessionId,
};

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Debug)]
pub struct ShoeResetRequest {
    pub session_id: SessionId,
}

async fn shoe_reset_handler(
    State(state): State<ServerState>,
    Json(payload): Json<ShoeResetRequest>,
) -> HandlerResponse<ShoeStatus> {
    let session_id = payload.session_id;
    Json(state.with_session(&session_id, |session| {
        session.reset();
        event!(Level::INFO, session = %session_id, "Shoe reset");
        Ok(ShoeStatus::new(session_id.clone(), session))
    }))
}

define_handler!(
    ShoeResetHandler {
        Request = ShoeResetRequest;
        Response = ShoeStatus;
        Method = POST;
        Path = "/shoe_reset";
        FN = shoe_reset_handler;
    }
);

impl BaccaratClient {
    pub async fn reset_shoe(&self, request: ShoeResetRequest) -> ClientResult<ShoeStatus> {
        self.query::<ShoeResetHandler>(request).await
    }
}
