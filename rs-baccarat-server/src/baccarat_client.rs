use axum::{body::Body, extract::Request, Router};
use http_body_util::BodyExt;
use thiserror::Error;
use tower::ServiceExt;

use crate::{error::ServerError, handler::Handler};

#[derive(Error, Debug)]
pub enum BaccaratClientError {
    #[error("Request error: {0}")]
    RequestError(String),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Server error: {0}")]
    ServerError(ServerError),
}

pub type ClientResult<T> = Result<T, BaccaratClientError>;

pub enum BaccaratClient {
    /// Calls the axum app in process.
    Test(Router),
    /// Calls a running server.
    Http { base_url: String },
}

impl BaccaratClient {
    pub fn new_test(app: Router) -> Self {
        BaccaratClient::Test(app)
    }

    pub fn new_http(base_url: &str) -> Self {
        BaccaratClient::Http {
            base_url: base_url.to_string(),
        }
    }

    pub async fn query<T: Handler>(&self, request: T::Request) -> ClientResult<T::Response> {
        match self {
            BaccaratClient::Test(router) => make_test_query::<T>(router, request).await,
            BaccaratClient::Http { base_url } => make_http_query::<T>(base_url, request).await,
        }
    }
}

fn query_string<T: serde::Serialize>(path: &str, request: &T) -> ClientResult<String> {
    let query = serde_urlencoded::to_string(request)
        .map_err(|e| BaccaratClientError::JsonParseError(e.to_string()))?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}

async fn make_http_query<T: Handler>(
    base_url: &str,
    request: T::Request,
) -> ClientResult<T::Response> {
    let client = reqwest::Client::new();
    let url = format!("{}{}", base_url, T::path());

    let response = match T::method() {
        reqwest::Method::GET => client.get(query_string(&url, &request)?).send().await,
        reqwest::Method::POST => client.post(&url).json(&request).send().await,
        _ => {
            return Err(BaccaratClientError::HttpError(
                "Unsupported HTTP method".to_string(),
            ));
        }
    }
    .map_err(|e| BaccaratClientError::HttpError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BaccaratClientError::HttpError(format!(
            "HTTP error: {}",
            response.status()
        )));
    }

    response
        .json::<Result<T::Response, ServerError>>()
        .await
        .map_err(|e| BaccaratClientError::HttpError(e.to_string()))?
        .map_err(BaccaratClientError::ServerError)
}

async fn make_test_query<T: Handler>(
    router: &Router,
    request: T::Request,
) -> ClientResult<T::Response> {
    let path = T::path();

    let axum_request = match T::method() {
        reqwest::Method::GET => Request::builder()
            .uri(query_string(path, &request)?)
            .body(Body::empty())
            .map_err(|e| BaccaratClientError::RequestError(e.to_string()))?,
        reqwest::Method::POST => {
            let body = serde_json::to_string(&request)
                .map_err(|e| BaccaratClientError::JsonParseError(e.to_string()))?;
            Request::builder()
                .uri(path)
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .map_err(|e| BaccaratClientError::RequestError(e.to_string()))?
        }
        _ => {
            return Err(BaccaratClientError::RequestError(
                "Unsupported HTTP method".to_string(),
            ));
        }
    };

    let response = router
        .clone()
        .oneshot(axum_request)
        .await
        .map_err(|e| BaccaratClientError::RequestError(e.to_string()))?;

    if !response.status().is_success() {
        return Err(BaccaratClientError::HttpError(format!(
            "HTTP error: {}",
            response.status()
        )));
    }

    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| BaccaratClientError::RequestError(e.to_string()))?
        .to_bytes();

    let server_result: Result<T::Response, ServerError> = serde_json::from_slice(&body)
        .map_err(|e| BaccaratClientError::JsonParseError(e.to_string()))?;

    server_result.map_err(BaccaratClientError::ServerError)
}
