//! The single choke point for backend communication.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpMethod, PreparedRequest, RequestOptions, prepare};

/// Successful outcome of a gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// 2xx response with a parsed JSON body.
    Data(Value),
    /// 204 response; nothing to parse.
    NoContent,
}

impl ApiPayload {
    /// Decode the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MalformedResponse`] for a 204 or a body that does
    /// not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            Self::Data(value) => serde_json::from_value(value).map_err(|err| {
                ApiError::malformed(format!("unexpected response shape: {err}"))
            }),
            Self::NoContent => Err(ApiError::malformed(
                "expected a response body but the server returned 204 No Content",
            )),
        }
    }
}

/// Dispatches requests against a fixed backend origin.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: Url,
}

impl ApiGateway {
    /// Wrap an HTTP client bound to `base_url`.
    #[must_use]
    pub const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Resolve a request without sending it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the URL cannot be formed.
    pub fn prepare(&self, path: &str, options: RequestOptions) -> ApiResult<PreparedRequest> {
        prepare(&self.base_url, path, options)
    }

    /// Send one request and normalise the outcome.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when the transport cannot complete.
    /// - [`ApiError::MalformedResponse`] when a 2xx body is not JSON.
    /// - [`ApiError::Request`] for any non-2xx status.
    /// - [`ApiError::InvalidRequest`] when the request cannot be built.
    pub async fn request(&self, path: &str, options: RequestOptions) -> ApiResult<ApiPayload> {
        let prepared = self.prepare(path, options)?;
        let method = prepared.method;
        let url = prepared.url.clone();
        tracing::debug!(method = %method, url = %url, "dispatching request");

        let response = prepared
            .into_builder(&self.client)?
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(method = %method, url = %url, error = %err, "request failed to send");
                ApiError::network(err.to_string())
            })?;

        let outcome = normalize(response).await;
        match &outcome {
            Ok(_) => tracing::debug!(method = %method, url = %url, "request succeeded"),
            Err(err) => tracing::warn!(
                method = %method,
                url = %url,
                status = ?err.status(),
                error = %err,
                "request failed"
            ),
        }
        outcome
    }

    /// Send a request and decode the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// As [`ApiGateway::request`]; additionally a 204 or a body that does not
    /// match `T` is an [`ApiError::MalformedResponse`].
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request(path, options).await?.decode()
    }

    /// Send a request whose body, if any, is not needed.
    ///
    /// # Errors
    ///
    /// As [`ApiGateway::request`].
    pub async fn request_empty(&self, path: &str, options: RequestOptions) -> ApiResult<()> {
        self.request(path, options).await.map(|_| ())
    }

    /// Shorthand for a `GET` decoded into `T`.
    ///
    /// # Errors
    ///
    /// As [`ApiGateway::request_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request_json(path, RequestOptions::new().method(HttpMethod::Get))
            .await
    }
}

async fn normalize(response: Response) -> ApiResult<ApiPayload> {
    let status = response.status();
    if !status.is_success() {
        return Err(request_failure(response).await);
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(ApiPayload::NoContent);
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| ApiError::network(err.to_string()))?;
    serde_json::from_slice(&bytes)
        .map(ApiPayload::Data)
        .map_err(|err| ApiError::malformed(err.to_string()))
}

async fn request_failure(response: Response) -> ApiError {
    let status = response.status();
    let fallback = fallback_message(status);
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let (message, data) = match response.bytes().await {
        Err(_) => (fallback, None),
        Ok(bytes) if is_json => match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Null) | Err(_) => (fallback, None),
            Ok(value) => (message_from_body(&value), Some(value)),
        },
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            if text.is_empty() {
                (fallback, None)
            } else {
                (text.into_owned(), None)
            }
        }
    };

    ApiError::Request {
        message,
        status: status.as_u16(),
        data,
    }
}

fn fallback_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Request failed with status {}: {reason}", status.as_u16()),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}

/// `message`, then `error`, then the whole body serialised.
fn message_from_body(body: &Value) -> String {
    meaningful_text(body.get("message"))
        .or_else(|| meaningful_text(body.get("error")))
        .unwrap_or_else(|| body.to_string())
}

fn meaningful_text(field: Option<&Value>) -> Option<String> {
    match field? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}
