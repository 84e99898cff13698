use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use axum::Router;
use rs_baccarat::{baccarat::ShoeSession, config::SimulationConfig};

use crate::{
    error::ServerError,
    handler::{
        analyze::AnalyzeHandler, health_check::HealthCheckHandler,
        session_end::SessionEndHandler, session_new::NewSessionHandler,
        shoe_reset::ShoeResetHandler, shoe_status::ShoeStatusHandler, simulate::SimulateHandler,
        Handler,
    },
    session_id::SessionId,
};

macro_rules! router {
    ($config:expr, $($handler:ident),* $(,)?) => {
        Router::new()
            $(
                .route($handler::path(), $handler::router())
            )*
            .with_state(ServerState::new($config))
    };
}

pub type Sessions = HashMap<SessionId, ShoeSession>;

#[derive(Clone)]
pub struct ServerState {
    pub sessions: Arc<Mutex<Sessions>>,
    pub config: Arc<SimulationConfig>,
}

impl ServerState {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    pub fn sessions(&self) -> Result<MutexGuard<'_, Sessions>, ServerError> {
        self.sessions
            .lock()
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    /// Run `f` against one session while holding the lock.
    pub fn with_session<T>(
        &self,
        session_id: &SessionId,
        f: impl FnOnce(&mut ShoeSession) -> Result<T, ServerError>,
    ) -> Result<T, ServerError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| ServerError::SessionNotFound(session_id.clone()))?;
        f(session)
    }
}

pub fn app_with_defaults() -> Router {
    app(SimulationConfig::default())
}

pub fn app(config: SimulationConfig) -> Router {
    router! {
        config,

        HealthCheckHandler,

        // Sessions.
        NewSessionHandler,
        ShoeStatusHandler,
        ShoeResetHandler,
        SessionEndHandler,

        // Simulation.
        SimulateHandler,
        AnalyzeHandler,
    }
}

#[cfg(test)]
mod tests {
    use rs_baccarat::baccarat::{Advisory, Bet};
    use rs_baccarat::core::BaccaratError;

    use super::*;
    use crate::{
        baccarat_client::{BaccaratClient, BaccaratClientError},
        handler::{
            analyze::AnalyzeRequest, health_check::HealthCheckRequest,
            session_end::SessionEndRequest, session_new::NewSessionRequest,
            shoe_reset::ShoeResetRequest, shoe_status::ShoeStatusRequest,
            simulate::SimulateRequest,
        },
    };

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            simulations_per_round: 500,
            rounds: 2,
            ..Default::default()
        }
    }

    fn client() -> BaccaratClient {
        BaccaratClient::new_test(app(small_config()))
    }

    async fn new_session(client: &BaccaratClient) -> SessionId {
        client
            .new_session(NewSessionRequest { num_decks: None })
            .await
            .unwrap()
            .session_id
    }

    #[tokio::test]
    async fn health_check_with_client() {
        let client = client();
        let request = HealthCheckRequest {
            id: "test-123".to_string(),
        };
        let result = client.health_check(request).await.unwrap();

        assert_eq!(result.id, "test-123");
        assert_eq!(result.status, "ok");
        assert_eq!(0, result.open_sessions);
        assert_eq!(small_config(), result.config);

        new_session(&client).await;
        let result = client
            .health_check(HealthCheckRequest {
                id: "again".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(1, result.open_sessions);
    }

    #[tokio::test]
    async fn ended_session_is_dropped() {
        let client = client();
        let session_id = new_session(&client).await;
        client
            .simulate(SimulateRequest {
                session_id: session_id.clone(),
                cards: vec![4, 5, 6, 7, 8],
                simulations_per_round: Some(100),
                rounds: Some(1),
            })
            .await
            .unwrap();

        let ended = client
            .end_session(SessionEndRequest {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(1, ended.round_count);
        assert_eq!(5, ended.used_cards);

        let status = client
            .shoe_status(ShoeStatusRequest {
                session_id: session_id.clone(),
            })
            .await;
        assert!(matches!(
            status,
            Err(BaccaratClientError::ServerError(ServerError::SessionNotFound(_)))
        ));
        let again = client.end_session(SessionEndRequest { session_id }).await;
        assert!(matches!(
            again,
            Err(BaccaratClientError::ServerError(ServerError::SessionNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn oversized_run_is_rejected() {
        let client = client();
        let result = client
            .analyze(AnalyzeRequest {
                cards: vec![],
                num_decks: None,
                simulations_per_round: None,
                rounds: Some(1 << 40),
            })
            .await;
        assert!(matches!(
            result,
            Err(BaccaratClientError::ServerError(ServerError::Simulation(
                BaccaratError::InvalidConfig(_)
            )))
        ));

        // The session is not touched by a rejected request.
        let session_id = new_session(&client).await;
        let result = client
            .simulate(SimulateRequest {
                session_id: session_id.clone(),
                cards: vec![1, 2, 3, 4],
                simulations_per_round: Some(usize::MAX),
                rounds: Some(2),
            })
            .await;
        assert!(matches!(
            result,
            Err(BaccaratClientError::ServerError(ServerError::Simulation(
                BaccaratError::InvalidConfig(_)
            )))
        ));
        let status = client
            .shoe_status(ShoeStatusRequest { session_id })
            .await
            .unwrap();
        assert_eq!(0, status.round_count);
        assert_eq!(0, status.used_cards);
    }

    #[tokio::test]
    async fn out_of_range_cards_are_structured_errors() {
        let client = client();
        for bad in [-1, 300, 0] {
            let result = client
                .analyze(AnalyzeRequest {
                    cards: vec![5, bad],
                    num_decks: None,
                    simulations_per_round: None,
                    rounds: None,
                })
                .await;
            match result {
                Err(BaccaratClientError::ServerError(err)) => {
                    assert_eq!(ServerError::Simulation(BaccaratError::InvalidCard(bad)), err)
                }
                other => panic!("unexpected result: {:?}", other.map(|r| r.round)),
            }
        }

        let session_id = new_session(&client).await;
        let result = client
            .simulate(SimulateRequest {
                session_id,
                cards: vec![-7],
                simulations_per_round: None,
                rounds: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(BaccaratClientError::ServerError(ServerError::Simulation(
                BaccaratError::InvalidCard(-7)
            )))
        ));
    }

    #[tokio::test]
    async fn timeout_returns_incomplete_report() {
        let config = SimulationConfig {
            timeout_ms: Some(0),
            ..small_config()
        };
        let client = BaccaratClient::new_test(app(config));
        let report = client
            .analyze(AnalyzeRequest {
                cards: vec![1, 2, 3],
                num_decks: None,
                simulations_per_round: None,
                rounds: None,
            })
            .await
            .unwrap();
        assert_eq!(0, report.result.total());
        assert_eq!(1_000, report.result.requested);
        assert!(!report.result.is_complete());
        assert!(report.recommendation.has_advisory(Advisory::Incomplete));
    }

    #[tokio::test]
    async fn new_session_starts_with_full_shoe() {
        let client = client();
        let created = client
            .new_session(NewSessionRequest { num_decks: Some(6) })
            .await
            .unwrap();
        assert_eq!(312, created.remaining_cards);

        let status = client
            .shoe_status(ShoeStatusRequest {
                session_id: created.session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(0, status.round_count);
        assert_eq!(0, status.used_cards);
        assert_eq!(13, status.distribution.len());
        assert_eq!(24, status.distribution[0].remaining);
    }

    #[tokio::test]
    async fn simulate_updates_ledger() {
        let client = client();
        let session_id = new_session(&client).await;

        let report = client
            .simulate(SimulateRequest {
                session_id: session_id.clone(),
                cards: vec![1, 3, 13, 6],
                simulations_per_round: None,
                rounds: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(Some(1), report.round);
        assert_eq!(412, report.remaining_cards);
        assert_eq!(3, report.batches.len());
        assert_eq!(1_500, report.result.total());
        assert_ne!(Bet::Tie, report.recommendation.bet());

        let status = client
            .shoe_status(ShoeStatusRequest {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(1, status.round_count);
        assert_eq!(4, status.used_cards);
        assert_eq!(412, status.remaining_cards);
    }

    #[tokio::test]
    async fn invalid_cards_leave_session_untouched() {
        let client = client();
        let session_id = new_session(&client).await;

        let result = client
            .simulate(SimulateRequest {
                session_id: session_id.clone(),
                cards: vec![1, 2, 14],
                simulations_per_round: None,
                rounds: None,
            })
            .await;
        match result {
            Err(BaccaratClientError::ServerError(err)) => {
                assert_eq!(ServerError::Simulation(BaccaratError::InvalidCard(14)), err)
            }
            other => panic!("unexpected result: {:?}", other.map(|r| r.round)),
        }

        let status = client
            .shoe_status(ShoeStatusRequest { session_id })
            .await
            .unwrap();
        assert_eq!(0, status.used_cards);
        assert_eq!(0, status.round_count);
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let client = client();
        let missing = SessionId::new("missing");
        let result = client
            .shoe_status(ShoeStatusRequest {
                session_id: missing.clone(),
            })
            .await;
        assert!(matches!(
            result,
            Err(BaccaratClientError::ServerError(
                ServerError::SessionNotFound(_)
            ))
        ));
    }

    #[tokio::test]
    async fn reset_starts_new_shoe() {
        let client = client();
        let session_id = new_session(&client).await;
        client
            .simulate(SimulateRequest {
                session_id: session_id.clone(),
                cards: vec![9, 9, 10, 11],
                simulations_per_round: Some(100),
                rounds: Some(1),
            })
            .await
            .unwrap();

        let status = client
            .reset_shoe(ShoeResetRequest {
                session_id: session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(0, status.round_count);
        assert_eq!(416, status.remaining_cards);
    }

    #[tokio::test]
    async fn analyze_without_session() {
        let client = client();
        let report = client
            .analyze(AnalyzeRequest {
                cards: vec![],
                num_decks: None,
                simulations_per_round: Some(1_000),
                rounds: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(None, report.round);
        assert_eq!(416, report.remaining_cards);
        assert_eq!(2_000, report.result.total());
        assert!(report
            .recommendation
            .has_advisory(Advisory::NegativeExpectation));
    }

    #[tokio::test]
    async fn analyze_rejects_depleted_shoe() {
        let client = client();
        let mut cards = vec![];
        for rank in 1..=13u8 {
            cards.extend(std::iter::repeat_n(rank, 4));
        }
        cards.truncate(52 - 3);
        let result = client
            .analyze(AnalyzeRequest {
                cards,
                num_decks: Some(1),
                simulations_per_round: None,
                rounds: None,
            })
            .await;
        assert!(matches!(
            result,
            Err(BaccaratClientError::ServerError(
                ServerError::Simulation(BaccaratError::ShoeDepleted {
                    remaining: 3,
                    required: 6
                })
            ))
        ));
    }
}
