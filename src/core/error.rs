use thiserror::Error;

/// This is the core error type for the
/// rs_baccarat library. It uses `thiserror` to provide
/// readable error messages
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaccaratError {
    #[error("Card value {0} is not a rank between 1 and 13")]
    InvalidCard(i64),
    #[error("Can't draw from an empty shoe")]
    EmptyShoe,
    #[error("Shoe too depleted to simulate: {remaining} cards left, {required} needed")]
    ShoeDepleted { remaining: usize, required: usize },
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
