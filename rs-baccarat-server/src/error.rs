use rs_baccarat::core::BaccaratError;
use thiserror::Error;

use crate::session_id::SessionId;

#[derive(Error, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ServerError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error("Simulation error: {0}")]
    Simulation(#[from] BaccaratError),

    #[error("Internal server error: {0}")]
    Internal(String),
}
