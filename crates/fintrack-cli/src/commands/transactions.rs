use chrono::Local;
use fintrack_api_models::Transaction;

use crate::cli::{
    OutputFormat, TransactionAddArgs, TransactionEditArgs, TransactionIdArgs,
    TransactionRemoveArgs,
};
use crate::client::{AppContext, CliError, CliResult, api_error};
use crate::commands::confirm::confirm_removal;
use crate::output::{render_transaction, render_transactions};

pub(crate) async fn handle_transaction_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let user = ctx.user()?;
    let transactions = ctx
        .api
        .transactions(user.id)
        .await
        .map_err(api_error("Failed to load transactions"))?;
    render_transactions(&transactions, ctx.currency(), format)
}

pub(crate) async fn handle_transaction_show(
    ctx: &AppContext,
    args: TransactionIdArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let user = ctx.user()?;
    let transaction = ctx
        .api
        .transaction(user.id, args.id)
        .await
        .map_err(api_error("Failed to load transaction"))?;
    render_transaction(&transaction, ctx.currency(), format)
}

pub(crate) async fn handle_transaction_add(
    ctx: &AppContext,
    args: TransactionAddArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let draft = Transaction::draft(
        args.kind,
        args.amount,
        args.category,
        date,
        args.description.as_deref(),
    )?;

    let saved = ctx
        .api
        .create_transaction(user.id, &draft)
        .await
        .map_err(api_error("Failed to save transaction"))?;
    match saved.id {
        Some(id) => println!("Transaction saved (id: {id})"),
        None => println!("Transaction saved"),
    }
    Ok(())
}

pub(crate) async fn handle_transaction_edit(
    ctx: &AppContext,
    args: TransactionEditArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    let existing = ctx
        .api
        .transaction(user.id, args.id)
        .await
        .map_err(api_error("Failed to load transaction"))?;
    let revised = overlay(&existing, &args)?;

    ctx.api
        .update_transaction(user.id, args.id, &revised)
        .await
        .map_err(api_error("Failed to save transaction"))?;
    println!("Transaction {} updated", args.id);
    Ok(())
}

pub(crate) async fn handle_transaction_remove(
    ctx: &AppContext,
    args: TransactionRemoveArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    if !confirm_removal("Are you sure you want to delete this transaction?", args.yes)? {
        println!("Deletion cancelled");
        return Ok(());
    }
    ctx.api
        .delete_transaction(user.id, args.id)
        .await
        .map_err(api_error("Failed to delete transaction"))?;
    println!("Transaction {} deleted", args.id);
    Ok(())
}

/// Apply the supplied flags on top of the stored record; server-filled
/// fields (`id`, `categoryName`) are not sent back.
fn overlay(existing: &Transaction, args: &TransactionEditArgs) -> CliResult<Transaction> {
    let description = args
        .description
        .as_deref()
        .or(existing.description.as_deref());
    Transaction::draft(
        args.kind.unwrap_or(existing.kind),
        args.amount.unwrap_or(existing.amount),
        args.category.unwrap_or(existing.category_id),
        args.date.unwrap_or(existing.date),
        description,
    )
    .map_err(CliError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::logged_in_context;
    use chrono::NaiveDate;
    use fintrack_api_models::TransactionType;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn stored() -> Transaction {
        Transaction {
            id: Some(31),
            kind: TransactionType::Expense,
            amount: 12.5,
            description: Some("Lunch".into()),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"),
            category_id: 2,
            category_name: Some("Food".into()),
        }
    }

    #[test]
    fn overlay_keeps_unspecified_fields() {
        let args = TransactionEditArgs {
            id: 31,
            amount: Some(20.0),
            ..TransactionEditArgs::default()
        };
        let revised = overlay(&stored(), &args).expect("valid overlay");
        assert_eq!(revised.id, None);
        assert_eq!(revised.category_name, None);
        assert_eq!(revised.kind, TransactionType::Expense);
        assert!((revised.amount - 20.0).abs() < f64::EPSILON);
        assert_eq!(revised.description.as_deref(), Some("Lunch"));
    }

    #[test]
    fn overlay_clears_description_and_validates_amount() {
        let args = TransactionEditArgs {
            id: 31,
            description: Some("  ".into()),
            ..TransactionEditArgs::default()
        };
        assert_eq!(overlay(&stored(), &args).expect("valid").description, None);

        let args = TransactionEditArgs {
            id: 31,
            amount: Some(-3.0),
            ..TransactionEditArgs::default()
        };
        let err = overlay(&stored(), &args).expect_err("negative amount");
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn list_uses_session_user() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/users/7/transactions");
            then.status(200).json_body(json!([{
                "id": 31,
                "type": "EXPENSE",
                "amount": 12.5,
                "description": "Lunch",
                "date": "2024-03-05",
                "categoryId": 2,
                "categoryName": "Food"
            }]));
        });
        let dir = TempDir::new()?;
        let ctx = logged_in_context(&server, &dir);

        handle_transaction_list(&ctx, OutputFormat::Table)
            .await
            .expect("list should succeed");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn add_posts_draft() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/users/7/transactions")
                .json_body(json!({
                    "type": "INCOME",
                    "amount": 1500.0,
                    "description": null,
                    "date": "2024-03-01",
                    "categoryId": 4
                }));
            then.status(201).json_body(json!({
                "id": 40,
                "type": "INCOME",
                "amount": 1500.0,
                "description": null,
                "date": "2024-03-01",
                "categoryId": 4
            }));
        });
        let dir = TempDir::new()?;
        let ctx = logged_in_context(&server, &dir);

        handle_transaction_add(
            &ctx,
            TransactionAddArgs {
                kind: TransactionType::Income,
                amount: 1500.0,
                category: 4,
                date: NaiveDate::from_ymd_opt(2024, 3, 1),
                description: Some(String::new()),
            },
        )
        .await
        .expect("add should succeed");
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn zero_amount_never_reaches_backend() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/users/7/transactions");
            then.status(201);
        });
        let dir = TempDir::new()?;
        let ctx = logged_in_context(&server, &dir);

        let err = handle_transaction_add(
            &ctx,
            TransactionAddArgs {
                kind: TransactionType::Expense,
                amount: 0.0,
                category: 4,
                date: None,
                description: None,
            },
        )
        .await
        .expect_err("zero amount");
        assert_eq!(err.exit_code(), 2);
        mock.assert_calls(0);
        Ok(())
    }

    #[tokio::test]
    async fn edit_fetches_then_puts_merged_record() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        let fetch = server.mock(|when, then| {
            when.method(GET).path("/api/users/7/transactions/31");
            then.status(200).json_body(json!({
                "id": 31,
                "type": "EXPENSE",
                "amount": 12.5,
                "description": "Lunch",
                "date": "2024-03-05",
                "categoryId": 2,
                "categoryName": "Food"
            }));
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/users/7/transactions/31")
                .json_body(json!({
                    "type": "EXPENSE",
                    "amount": 14.0,
                    "description": "Lunch",
                    "date": "2024-03-05",
                    "categoryId": 2
                }));
            then.status(200).json_body(json!({
                "id": 31,
                "type": "EXPENSE",
                "amount": 14.0,
                "description": "Lunch",
                "date": "2024-03-05",
                "categoryId": 2
            }));
        });
        let dir = TempDir::new()?;
        let ctx = logged_in_context(&server, &dir);

        handle_transaction_edit(
            &ctx,
            TransactionEditArgs {
                id: 31,
                amount: Some(14.0),
                ..TransactionEditArgs::default()
            },
        )
        .await
        .expect("edit should succeed");
        fetch.assert();
        update.assert();
        Ok(())
    }

    #[tokio::test]
    async fn missing_transaction_surfaces_backend_message() -> anyhow::Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/users/7/transactions/99");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({"message": "Transaction not found"}));
        });
        let dir = TempDir::new()?;
        let ctx = logged_in_context(&server, &dir);

        let err = handle_transaction_remove(&ctx, TransactionRemoveArgs { id: 99, yes: true })
            .await
            .expect_err("not found");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "Failed to delete transaction: Transaction not found (status 404)"
        );
        Ok(())
    }
}
