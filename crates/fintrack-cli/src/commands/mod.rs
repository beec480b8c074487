//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod confirm;
pub(crate) mod profile;
pub(crate) mod reports;
pub(crate) mod transactions;
