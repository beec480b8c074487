//! Request options and the pure preparation step that turns them into a
//! dispatchable request.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Media type sent in the default `Accept` header and for JSON bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// HTTP methods the gateway supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
}

impl HttpMethod {
    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }

    /// `GET` and `HEAD` never carry a body or a `Content-Type`.
    #[must_use]
    pub const fn allows_body(self) -> bool {
        !matches!(self, Self::Get | Self::Head)
    }

    pub(crate) const fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
            Self::Head => reqwest::Method::HEAD,
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            _ => Err(ApiError::invalid_request(format!(
                "unsupported HTTP method '{value}'"
            ))),
        }
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartPart {
    /// Plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// File upload field.
    File {
        /// Field name.
        name: String,
        /// File name reported to the server.
        file_name: String,
        /// Optional media type of the file contents.
        content_type: Option<String>,
        /// File contents.
        bytes: Vec<u8>,
    },
}

/// Multipart form payload, passed to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<MultipartPart>,
}

impl MultipartPayload {
    /// Empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    #[must_use]
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(MultipartPart::File {
            name: name.into(),
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        });
        self
    }

    pub(crate) fn into_form(self) -> ApiResult<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                MultipartPart::Text { name, value } => form.text(name, value),
                MultipartPart::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let mut file = Part::bytes(bytes).file_name(file_name);
                    if let Some(content_type) = content_type {
                        file = file.mime_str(&content_type).map_err(|err| {
                            ApiError::invalid_request(format!(
                                "invalid multipart content type '{content_type}': {err}"
                            ))
                        })?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

/// Request body as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Structured record; serialised to JSON text with a JSON content type.
    Json(Value),
    /// Multipart form; the transport sets the boundary header.
    Multipart(MultipartPayload),
    /// Opaque bytes sent as-is.
    Raw(Vec<u8>),
}

/// Per-call request configuration.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    method: HttpMethod,
    body: Option<RequestBody>,
    headers: HeaderMap,
}

impl RequestOptions {
    /// `GET` with no body and no extra headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Attach a body.
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a structured record as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when the value cannot be
    /// represented as JSON.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(value).map_err(|err| {
            ApiError::invalid_request(format!("failed to encode request body: {err}"))
        })?;
        Ok(self.body(RequestBody::Json(value)))
    }

    /// Set a header, replacing any earlier value with the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Body after preparation.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedBody {
    /// Bytes sent verbatim.
    Bytes(Vec<u8>),
    /// Multipart form handed to the transport.
    Multipart(MultipartPayload),
}

/// Fully resolved request, ready for dispatch.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: Url,
    /// Default headers merged with caller headers.
    pub headers: HeaderMap,
    /// Body, never present for `GET`/`HEAD`.
    pub body: Option<PreparedBody>,
}

impl PreparedRequest {
    pub(crate) fn into_builder(self, client: &reqwest::Client) -> ApiResult<reqwest::RequestBuilder> {
        let builder = client
            .request(self.method.to_reqwest(), self.url)
            .headers(self.headers);
        Ok(match self.body {
            None => builder,
            Some(PreparedBody::Bytes(bytes)) => builder.body(bytes),
            Some(PreparedBody::Multipart(payload)) => builder.multipart(payload.into_form()?),
        })
    }
}

/// Resolve `options` against `base` into a [`PreparedRequest`].
///
/// Caller headers win over the default `Accept`; a JSON body forces
/// `Content-Type: application/json`; `GET`/`HEAD` drop both the body and any
/// `Content-Type`.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] when `base` and `path` do not form a
/// valid URL.
pub fn prepare(base: &Url, path: &str, options: RequestOptions) -> ApiResult<PreparedRequest> {
    let url = join_url(base, path)?;
    let RequestOptions {
        method,
        body,
        headers: caller_headers,
    } = options;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    for name in caller_headers.keys() {
        headers.remove(name);
    }
    for (name, value) in &caller_headers {
        headers.append(name.clone(), value.clone());
    }

    let body = match body {
        None => None,
        Some(RequestBody::Json(value)) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
            Some(PreparedBody::Bytes(value.to_string().into_bytes()))
        }
        Some(RequestBody::Multipart(payload)) => {
            headers.remove(CONTENT_TYPE);
            Some(PreparedBody::Multipart(payload))
        }
        Some(RequestBody::Raw(bytes)) => Some(PreparedBody::Bytes(bytes)),
    };

    let body = if method.allows_body() {
        body
    } else {
        headers.remove(CONTENT_TYPE);
        None
    };

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
    })
}

fn join_url(base: &Url, path: &str) -> ApiResult<Url> {
    let origin = base.as_str().trim_end_matches('/');
    let joined = if path.starts_with('/') {
        format!("{origin}{path}")
    } else {
        format!("{origin}/{path}")
    };
    Url::parse(&joined)
        .map_err(|err| ApiError::invalid_request(format!("invalid request URL '{joined}': {err}")))
}
