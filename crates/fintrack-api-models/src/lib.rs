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
//! Shared HTTP DTOs for the Fintrack backend API.
//!
//! These types are used by the client for request/response encoding so the
//! wire contract (camelCase JSON, `YYYY-MM-DD` dates, upper-case transaction
//! kinds) lives in one place. Input checks that the web forms used to perform
//! before submitting are kept next to the payloads they guard.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend identifier for users, transactions, and categories.
pub type RecordId = i64;

/// Input rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Login form was submitted without an email or password.
    #[error("Please enter both email and password.")]
    MissingCredentials,
    /// Registration form was submitted with a blank field.
    #[error("Please fill in all required fields.")]
    MissingRegistrationFields,
    /// Profile form was submitted with a blank name or currency.
    #[error("Name and Currency cannot be empty.")]
    MissingProfileFields,
    /// Currency code was not three letters.
    #[error("Currency code must be 3 letters (e.g., USD).")]
    InvalidCurrency {
        /// Value supplied by the caller.
        value: String,
    },
    /// Transaction amount was zero, negative, or not a number.
    #[error("Amount must be a positive number.")]
    NonPositiveAmount,
    /// Category name was blank.
    #[error("Category name cannot be empty.")]
    EmptyCategoryName,
    /// Transaction kind was neither income nor expense.
    #[error("Transaction type must be INCOME or EXPENSE.")]
    InvalidTransactionType {
        /// Value supplied by the caller.
        value: String,
    },
    /// Report period was not `YYYY` or `YYYY-MM`.
    #[error("Please select a valid period (expected YYYY or YYYY-MM, got '{value}').")]
    InvalidPeriod {
        /// Value supplied by the caller.
        value: String,
    },
}

/// Trim a currency code, upper-case it, and require exactly three ASCII letters.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCurrency`] when the normalised value is
/// not three letters long.
pub fn normalize_currency(raw: &str) -> Result<String, ValidationError> {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() == 3 && code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidCurrency {
            value: raw.to_string(),
        })
    }
}

/// User profile as returned by the auth and profile endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier.
    pub id: RecordId,
    #[serde(default)]
    /// Display name.
    pub name: Option<String>,
    #[serde(default)]
    /// Login email.
    pub email: Option<String>,
    #[serde(default)]
    /// ISO-4217 code used when formatting amounts.
    pub preferred_currency: Option<String>,
}

/// Credentials posted to `/api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password; only ever sent to the backend.
    pub password: String,
}

impl LoginRequest {
    /// Build a login payload from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingCredentials`] when either field is blank.
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        let password = password.trim();
        if email.is_empty() || password.is_empty() {
            return Err(ValidationError::MissingCredentials);
        }
        Ok(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

/// Payload posted to `/api/auth/register`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Three-letter currency code.
    pub preferred_currency: String,
}

impl RegistrationRequest {
    /// Build a registration payload from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRegistrationFields`] when any field is
    /// blank and [`ValidationError::InvalidCurrency`] for a malformed code.
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        currency: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        let password = password.trim();
        if name.is_empty() || email.is_empty() || password.is_empty() || currency.trim().is_empty()
        {
            return Err(ValidationError::MissingRegistrationFields);
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            preferred_currency: normalize_currency(currency)?,
        })
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .field("preferred_currency", &self.preferred_currency)
            .finish()
    }
}

/// Fields the profile form may change; email and password are never sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Identifier of the profile being updated.
    pub id: RecordId,
    /// New display name.
    pub name: String,
    /// New three-letter currency code.
    pub preferred_currency: String,
}

impl ProfileUpdate {
    /// Build a profile update from raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingProfileFields`] for blank input and
    /// [`ValidationError::InvalidCurrency`] for a malformed code.
    pub fn new(id: RecordId, name: &str, currency: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() || currency.trim().is_empty() {
            return Err(ValidationError::MissingProfileFields);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            preferred_currency: normalize_currency(currency)?,
        })
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// Wire label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(ValidationError::InvalidTransactionType {
                value: value.to_string(),
            }),
        }
    }
}

/// Transaction record used for listing, creating, and updating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Backend identifier; absent on create.
    pub id: Option<RecordId>,
    #[serde(rename = "type")]
    /// Income or expense.
    pub kind: TransactionType,
    /// Positive amount in the user's currency.
    pub amount: f64,
    #[serde(default)]
    /// Optional free-form note; sent as `null` when empty.
    pub description: Option<String>,
    /// Booking date.
    pub date: NaiveDate,
    /// Category the transaction is filed under.
    pub category_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Category display name, filled in by the backend.
    pub category_name: Option<String>,
}

impl Transaction {
    /// Build a new (unsaved) transaction from form input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveAmount`] when the amount is not a
    /// positive finite number.
    pub fn draft(
        kind: TransactionType,
        amount: f64,
        category_id: RecordId,
        date: NaiveDate,
        description: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let draft = Self {
            id: None,
            kind,
            amount,
            description: normalize_description(description),
            date,
            category_id,
            category_name: None,
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Check the invariants the backend expects.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveAmount`] for zero, negative, or
    /// non-finite amounts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount.is_finite() && self.amount > 0.0 {
            Ok(())
        } else {
            Err(ValidationError::NonPositiveAmount)
        }
    }

    /// Signed amount: expenses count negative.
    #[must_use]
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Trim a description; blank input becomes `None`.
#[must_use]
pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Spending category owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Backend identifier; absent on create.
    pub id: Option<RecordId>,
    /// Display name.
    pub name: String,
}

impl Category {
    /// Build an unsaved category.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCategoryName`] for a blank name.
    pub fn named(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(Self {
            id: None,
            name: name.to_string(),
        })
    }
}

/// Income/expense totals for a month or a year.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    /// Sum of income transactions.
    pub total_income: f64,
    #[serde(default)]
    /// Sum of expense transactions.
    pub total_expenses: f64,
    #[serde(default)]
    /// `total_income - total_expenses`.
    pub balance: f64,
}

/// Spending per category, as parallel label/value lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    #[serde(default)]
    /// Category names.
    pub labels: Vec<String>,
    #[serde(default)]
    /// Amount spent per category, aligned with `labels`.
    pub values: Vec<f64>,
}

impl ChartData {
    /// Label/value pairs; trailing entries without a partner are dropped.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries().map(|(_, value)| value).sum()
    }
}

/// Reporting window: a whole year or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    /// Calendar year.
    Year(i32),
    /// Calendar month (1-12) within a year.
    Month {
        /// Calendar year.
        year: i32,
        /// Month number, 1-12.
        month: u32,
    },
}

impl ReportPeriod {
    /// Calendar year of the period.
    #[must_use]
    pub const fn year(self) -> i32 {
        match self {
            Self::Year(year) | Self::Month { year, .. } => year,
        }
    }

    /// Month number, when the period is a single month.
    #[must_use]
    pub const fn month(self) -> Option<u32> {
        match self {
            Self::Year(_) => None,
            Self::Month { month, .. } => Some(month),
        }
    }

    /// Query string used by the report endpoints (without the leading `?`).
    #[must_use]
    pub fn query(self) -> String {
        match self {
            Self::Year(year) => format!("year={year}"),
            Self::Month { year, month } => format!("year={year}&month={month}"),
        }
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year:04}"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
        }
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidPeriod {
            value: value.to_string(),
        };
        let trimmed = value.trim();
        let all_digits = |part: &str, len: usize| {
            part.len() == len && part.chars().all(|ch| ch.is_ascii_digit())
        };

        match trimmed.split_once('-') {
            None if all_digits(trimmed, 4) => trimmed.parse().map(Self::Year).map_err(|_| invalid()),
            Some((year, month)) if all_digits(year, 4) && all_digits(month, 2) => {
                let year = year.parse().map_err(|_| invalid())?;
                let month: u32 = month.parse().map_err(|_| invalid())?;
                if (1..=12).contains(&month) {
                    Ok(Self::Month { year, month })
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_request_trims_and_requires_both_fields() {
        let request = LoginRequest::new("  a@b.test ", " secret ").expect("valid login");
        assert_eq!(request.email, "a@b.test");
        assert_eq!(request.password, "secret");

        assert_eq!(
            LoginRequest::new("a@b.test", "   "),
            Err(ValidationError::MissingCredentials)
        );
    }

    #[test]
    fn registration_normalizes_currency_and_hides_password() {
        let request =
            RegistrationRequest::new("Ada", "ada@example.test", "pw", " eur ").expect("valid");
        assert_eq!(request.preferred_currency, "EUR");
        assert!(!format!("{request:?}").contains("pw\""));

        let body = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            body,
            json!({
                "name": "Ada",
                "email": "ada@example.test",
                "password": "pw",
                "preferredCurrency": "EUR"
            })
        );
    }

    #[test]
    fn registration_rejects_blank_fields_before_currency() {
        assert_eq!(
            RegistrationRequest::new("Ada", "", "pw", "usd"),
            Err(ValidationError::MissingRegistrationFields)
        );
        assert!(matches!(
            RegistrationRequest::new("Ada", "a@b.test", "pw", "dollars"),
            Err(ValidationError::InvalidCurrency { .. })
        ));
    }

    #[test]
    fn currency_requires_three_letters() {
        assert_eq!(normalize_currency("gbp"), Ok("GBP".to_string()));
        assert!(normalize_currency("US").is_err());
        assert!(normalize_currency("U5D").is_err());
    }

    #[test]
    fn profile_update_omits_email_and_password() {
        let update = ProfileUpdate::new(7, " Grace ", "usd").expect("valid");
        let body = serde_json::to_value(&update).expect("serialize");
        assert_eq!(
            body,
            json!({"id": 7, "name": "Grace", "preferredCurrency": "USD"})
        );
        assert_eq!(
            ProfileUpdate::new(7, "", "usd"),
            Err(ValidationError::MissingProfileFields)
        );
    }

    #[test]
    fn transaction_draft_serializes_wire_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        let draft = Transaction::draft(TransactionType::Expense, 12.5, 4, date, Some("  "))
            .expect("valid draft");
        let body = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(
            body,
            json!({
                "type": "EXPENSE",
                "amount": 12.5,
                "description": null,
                "date": "2024-03-09",
                "categoryId": 4
            })
        );
        assert!((draft.signed_amount() + 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn transaction_draft_rejects_non_positive_amounts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("date");
        for amount in [0.0, -1.0, f64::NAN] {
            assert_eq!(
                Transaction::draft(TransactionType::Income, amount, 1, date, None),
                Err(ValidationError::NonPositiveAmount)
            );
        }
    }

    #[test]
    fn transaction_deserializes_backend_record() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": 3,
            "type": "INCOME",
            "amount": 1500,
            "description": "salary",
            "date": "2024-01-31",
            "categoryId": 2,
            "categoryName": "Work"
        }))
        .expect("deserialize");
        assert_eq!(tx.id, Some(3));
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.category_name.as_deref(), Some("Work"));
    }

    #[test]
    fn transaction_type_parses_case_insensitively() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!(" Expense ".parse(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn category_name_is_required() {
        assert_eq!(Category::named(" Food ").map(|c| c.name), Ok("Food".into()));
        assert_eq!(Category::named(" "), Err(ValidationError::EmptyCategoryName));
    }

    #[test]
    fn summary_defaults_missing_totals_to_zero() {
        let summary: Summary =
            serde_json::from_value(json!({"totalIncome": 10.0})).expect("deserialize");
        assert!((summary.total_income - 10.0).abs() < f64::EPSILON);
        assert!(summary.total_expenses.abs() < f64::EPSILON);
        assert!(summary.balance.abs() < f64::EPSILON);
    }

    #[test]
    fn chart_entries_pair_labels_with_values() {
        let chart = ChartData {
            labels: vec!["Food".into(), "Rent".into(), "Orphan".into()],
            values: vec![25.0, 75.0],
        };
        let entries: Vec<_> = chart.entries().collect();
        assert_eq!(entries, vec![("Food", 25.0), ("Rent", 75.0)]);
        assert!((chart.total() - 100.0).abs() < f64::EPSILON);
        assert_eq!(ChartData::default().entries().count(), 0);
    }

    #[test]
    fn report_period_parses_year_and_month() {
        assert_eq!("2024".parse(), Ok(ReportPeriod::Year(2024)));
        let month: ReportPeriod = "2024-03".parse().expect("month");
        assert_eq!(month, ReportPeriod::Month { year: 2024, month: 3 });
        assert_eq!(month.query(), "year=2024&month=3");
        assert_eq!(month.to_string(), "2024-03");
        assert_eq!(ReportPeriod::Year(2024).query(), "year=2024");
    }

    #[test]
    fn report_period_rejects_malformed_input() {
        for value in ["24-03", "2024-13", "2024-00", "2024-3", "march", ""] {
            assert!(
                value.parse::<ReportPeriod>().is_err(),
                "{value} should be rejected"
            );
        }
    }
}
