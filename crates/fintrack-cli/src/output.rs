//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use fintrack_api_models::{Category, ChartData, ReportPeriod, Summary, Transaction, User};
use fintrack_client::AuthenticatedUser;
use fintrack_client::format::{border_color, format_currency};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_user(user: &User, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user)?,
        OutputFormat::Table => {
            println!("id: {}", user.id);
            println!("name: {}", user.name.as_deref().unwrap_or("-"));
            println!("email: {}", user.email.as_deref().unwrap_or("-"));
            println!(
                "currency: {}",
                user.preferred_currency.as_deref().unwrap_or("-")
            );
        }
    }
    Ok(())
}

pub(crate) fn render_session(user: &AuthenticatedUser, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "id": user.id,
            "name": user.name,
            "currency": user.currency,
        }))?,
        OutputFormat::Table => {
            println!("Welcome, {}!", user.display_name());
            println!("id: {}", user.id);
            if let Some(currency) = &user.currency {
                println!("currency: {currency}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_transactions(
    transactions: &[Transaction],
    currency: &str,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(transactions)?,
        OutputFormat::Table => {
            if transactions.is_empty() {
                println!("No transactions found.");
                return Ok(());
            }
            println!(
                "{:>6} {:<10} {:<7} {:>16} {:<16} DESCRIPTION",
                "ID", "DATE", "TYPE", "AMOUNT", "CATEGORY"
            );
            for transaction in transactions {
                println!("{}", transaction_row(transaction, currency));
            }
        }
    }
    Ok(())
}

pub(crate) fn render_transaction(
    transaction: &Transaction,
    currency: &str,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(transaction)?,
        OutputFormat::Table => {
            if let Some(id) = transaction.id {
                println!("id: {id}");
            }
            println!("date: {}", transaction.date);
            println!("type: {}", transaction.kind);
            println!(
                "amount: {}",
                format_currency(transaction.signed_amount(), currency)
            );
            println!("category: {}", category_label(transaction));
            if let Some(description) = &transaction.description {
                println!("description: {description}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_categories(categories: &[Category], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(categories)?,
        OutputFormat::Table => {
            if categories.is_empty() {
                println!("No categories yet.");
                return Ok(());
            }
            println!("{:>6} NAME", "ID");
            for category in categories {
                let id = category
                    .id
                    .map_or_else(|| "-".to_string(), |id| id.to_string());
                println!("{id:>6} {}", category.name);
            }
        }
    }
    Ok(())
}

pub(crate) fn render_summary(
    summary: &Summary,
    period: ReportPeriod,
    currency: &str,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Table => {
            println!("period: {period}");
            println!("income: {}", format_currency(summary.total_income, currency));
            println!(
                "expenses: {}",
                format_currency(summary.total_expenses, currency)
            );
            println!("balance: {}", format_currency(summary.balance, currency));
        }
    }
    Ok(())
}

/// One labelled chart slice with its assigned colours.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ChartRow {
    pub(crate) label: String,
    pub(crate) value: f64,
    pub(crate) share: f64,
    pub(crate) color: String,
    pub(crate) border_color: String,
}

pub(crate) fn chart_rows(chart: &ChartData, colors: &[String]) -> Vec<ChartRow> {
    let total = chart.total();
    chart
        .entries()
        .zip(colors)
        .map(|((label, value), color)| ChartRow {
            label: label.to_string(),
            value,
            share: share_percent(value, total),
            color: color.clone(),
            border_color: border_color(color),
        })
        .collect()
}

pub(crate) fn render_chart(
    chart: &ChartData,
    colors: &[String],
    period: ReportPeriod,
    currency: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let rows = chart_rows(chart, colors);
    match format {
        OutputFormat::Json => print_json(&json!({
            "period": period.to_string(),
            "currency": currency,
            "rows": rows,
        }))?,
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No expense data for {period}.");
                return Ok(());
            }
            println!("expenses by category, {period}");
            println!("{:<20} {:>16} {:>7} COLOR", "CATEGORY", "AMOUNT", "SHARE");
            for row in &rows {
                println!(
                    "{:<20} {:>16} {:>6.1}% {}",
                    row.label,
                    format_currency(row.value, currency),
                    row.share,
                    row.color
                );
            }
        }
    }
    Ok(())
}

#[must_use]
pub(crate) fn transaction_row(transaction: &Transaction, currency: &str) -> String {
    let id = transaction
        .id
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    format!(
        "{id:>6} {:<10} {:<7} {:>16} {:<16} {}",
        transaction.date.to_string(),
        transaction.kind.as_str(),
        format_currency(transaction.signed_amount(), currency),
        category_label(transaction),
        transaction.description.as_deref().unwrap_or("")
    )
}

fn category_label(transaction: &Transaction) -> String {
    transaction
        .category_name
        .clone()
        .unwrap_or_else(|| format!("#{}", transaction.category_id))
}

#[must_use]
pub(crate) fn share_percent(value: f64, total: f64) -> f64 {
    if total.abs() < f64::EPSILON {
        0.0
    } else {
        value / total * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_api_models::TransactionType;

    fn lunch() -> Transaction {
        Transaction {
            id: Some(31),
            kind: TransactionType::Expense,
            amount: 1234.5,
            description: Some("Team lunch".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"),
            category_id: 2,
            category_name: Some("Food".into()),
        }
    }

    #[test]
    fn transaction_row_signs_expenses() {
        let row = transaction_row(&lunch(), "EUR");
        assert!(row.contains("2024-03-05"));
        assert!(row.contains("EXPENSE"));
        assert!(row.contains("-EUR 1,234.50"));
        assert!(row.ends_with("Team lunch"));
    }

    #[test]
    fn transaction_row_falls_back_to_category_id() {
        let mut transaction = lunch();
        transaction.category_name = None;
        transaction.description = None;
        let row = transaction_row(&transaction, "EUR");
        assert!(row.contains("#2"));
    }

    #[test]
    fn chart_rows_pair_labels_with_colours() {
        let chart = ChartData {
            labels: vec!["Food".into(), "Rent".into()],
            values: vec![25.0, 75.0],
        };
        let colors = vec![
            "rgba(54, 162, 235, 0.6)".to_string(),
            "hsla(80, 70%, 60%, 0.6)".to_string(),
        ];
        let rows = chart_rows(&chart, &colors);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Food");
        assert!((rows[0].share - 25.0).abs() < f64::EPSILON);
        assert_eq!(rows[1].border_color, "hsla(80, 70%, 60%, 1)");
    }

    #[test]
    fn share_of_empty_total_is_zero() {
        assert!(share_percent(10.0, 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn renderers_accept_both_formats() -> CliResult<()> {
        for format in [OutputFormat::Table, OutputFormat::Json] {
            render_transactions(&[lunch()], "EUR", format)?;
            render_transaction(&lunch(), "EUR", format)?;
            render_categories(&[Category { id: Some(2), name: "Food".into() }], format)?;
            render_summary(
                &Summary {
                    total_income: 10.0,
                    total_expenses: 4.0,
                    balance: 6.0,
                },
                ReportPeriod::Year(2024),
                "USD",
                format,
            )?;
        }
        Ok(())
    }
}
