//! Application context, error classification, and HTTP client wiring for the CLI.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use fintrack_api_models::ValidationError;
use fintrack_client::{
    ApiError, ApiGateway, AuthenticatedUser, FileStore, FinanceApi, SessionContext, SessionError,
};
use fintrack_config::{ClientConfig, ConfigError, PresentationSettings};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";
const SESSION_DIR: &str = ".fintrack";
const SESSION_FILE: &str = "session.json";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotAuthenticated => {
                Self::validation(format!("{err} Run `fintrack login` first."))
            }
            other => Self::failure(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField { .. } => Self::validation(err.to_string()),
            other => Self::failure(anyhow::Error::new(other).context("failed to load configuration")),
        }
    }
}

/// Classify a gateway failure; rejected input (400/409/422) is a validation error.
pub(crate) fn api_error(context: &'static str) -> impl FnOnce(ApiError) -> CliError {
    move |err| match err.status() {
        Some(400 | 409 | 422) => CliError::validation(err.message()),
        Some(status) => CliError::failure(anyhow!("{context}: {} (status {status})", err.message())),
        None => CliError::failure(anyhow::Error::new(err).context(context)),
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) api: FinanceApi,
    pub(crate) session: SessionContext<FileStore>,
    pub(crate) presentation: PresentationSettings,
}

impl AppContext {
    /// Wire the gateway and session store from resolved configuration.
    ///
    /// A corrupt session file is an error unless `reset_corrupt_session` is
    /// set, in which case it is replaced by an empty one.
    pub(crate) fn from_config(
        config: &ClientConfig,
        session_file: &Path,
        trace_id: &str,
        reset_corrupt_session: bool,
    ) -> CliResult<Self> {
        let client = build_http_client(trace_id)?;
        let gateway = ApiGateway::new(client, config.api.base_url.clone());
        let store = if reset_corrupt_session {
            FileStore::open_or_reset(session_file)?
        } else {
            FileStore::open(session_file)?
        };
        Ok(Self {
            api: FinanceApi::new(gateway),
            session: SessionContext::init(store),
            presentation: config.presentation.clone(),
        })
    }

    /// Logged-in user, or a validation error telling the caller to log in.
    pub(crate) fn user(&self) -> CliResult<AuthenticatedUser> {
        Ok(self.session.require_authenticated()?.clone())
    }

    /// Currency used to format amounts: the session's, else the configured default.
    pub(crate) fn currency(&self) -> &str {
        self.session
            .currency_or(&self.presentation.default_currency)
    }
}

/// HTTP client tagging every request with the invocation's trace id.
pub(crate) fn build_http_client(trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// `$HOME/.fintrack/session.json`, or a file in the working directory when
/// `HOME` is unset.
pub(crate) fn default_session_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(SESSION_DIR).join(SESSION_FILE),
        |home| PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE),
    )
}
