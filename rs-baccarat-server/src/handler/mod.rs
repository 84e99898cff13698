use axum::{routing::MethodRouter, Json};
use reqwest::Method;

use crate::{baccarat_server::ServerState, error::ServerError};

pub mod analyze;
pub mod health_check;
pub mod session_end;
pub mod session_new;
pub mod shoe_reset;
pub mod shoe_status;
pub mod simulate;

pub type HandlerResponse<T> = Json<Result<T, ServerError>>;

pub trait Handler {
    type Request: serde::de::DeserializeOwned + serde::Serialize;
    type Response: serde::de::DeserializeOwned + serde::Serialize;
    fn router() -> MethodRouter<ServerState>;
    fn method() -> Method;
    fn path() -> &'static str;
}

#[macro_export]
macro_rules! define_handler {
    (@route GET, $handler_fn:ident) => {
        axum::routing::get($handler_fn)
    };
    (@route POST, $handler_fn:ident) => {
        axum::routing::post($handler_fn)
    };
    (
        $handler_name:ident {
            Request = $request:ty;
            Response = $response:ty;
            Method = $method:ident;
            Path = $path:expr;
            FN = $handler_fn:ident;
        }
    ) => {
        pub struct $handler_name;

        impl $crate::handler::Handler for $handler_name {
            type Request = $request;
            type Response = $response;

            fn method() -> reqwest::Method {
                reqwest::Method::$method
            }

            fn path() -> &'static str {
                $path
            }

            fn router() -> axum::routing::MethodRouter<$crate::baccarat_server::ServerState> {
                $crate::define_handler!(@route $method, $handler_fn)
            }
        }
    };
}
