pub mod baccarat_client;
pub mod baccarat_server;
pub mod error;
pub mod handler;
pub mod session_id;
