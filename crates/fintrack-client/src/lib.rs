#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client-side plumbing for the Fintrack backend.
//!
//! Layout:
//! - `request.rs`: request options and the pure request-preparation step
//! - `gateway.rs`: the single choke point that dispatches requests and
//!   normalises every response into data, no-data, or an [`ApiError`]
//! - `api.rs`: typed wrappers for each backend endpoint
//! - `session/`: the explicit session context and its key-value stores
//! - `format.rs`: presentation helpers (currency, chart colours)

pub mod api;
pub mod error;
pub mod format;
pub mod gateway;
pub mod request;
pub mod session;

pub use api::FinanceApi;
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use gateway::{ApiGateway, ApiPayload};
pub use request::{
    HttpMethod, MultipartPart, MultipartPayload, PreparedBody, PreparedRequest, RequestBody,
    RequestOptions,
};
pub use session::{
    AuthenticatedUser, FileStore, KeyValueStore, MemoryStore, SessionContext, SessionError,
    SessionResult, SessionState,
};
