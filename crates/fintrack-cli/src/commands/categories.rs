use fintrack_api_models::Category;

use crate::cli::{CategoryAddArgs, CategoryRemoveArgs, CategoryRenameArgs, OutputFormat};
use crate::client::{AppContext, CliResult, api_error};
use crate::commands::confirm::confirm_removal;
use crate::output::render_categories;

pub(crate) async fn handle_category_list(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let user = ctx.user()?;
    let categories = ctx
        .api
        .categories(user.id)
        .await
        .map_err(api_error("Failed to load categories"))?;
    render_categories(&categories, format)
}

pub(crate) async fn handle_category_add(ctx: &AppContext, args: CategoryAddArgs) -> CliResult<()> {
    let user = ctx.user()?;
    let category = Category::named(&args.name)?;

    let created = ctx
        .api
        .create_category(user.id, &category)
        .await
        .map_err(api_error("Failed to save category"))?;
    match created.id {
        Some(id) => println!("Category '{}' created (id: {id})", created.name),
        None => println!("Category '{}' created", created.name),
    }
    Ok(())
}

pub(crate) async fn handle_category_rename(
    ctx: &AppContext,
    args: CategoryRenameArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    let category = Category::named(&args.name)?;

    let renamed = ctx
        .api
        .rename_category(user.id, args.id, &category)
        .await
        .map_err(api_error("Failed to rename category"))?;
    println!("Category {} renamed to '{}'", args.id, renamed.name);
    Ok(())
}

pub(crate) async fn handle_category_remove(
    ctx: &AppContext,
    args: CategoryRemoveArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    if !confirm_removal(
        "Are you sure you want to delete this category? Transactions using it might be affected.",
        args.yes,
    )? {
        println!("Deletion cancelled");
        return Ok(());
    }
    ctx.api
        .delete_category(user.id, args.id)
        .await
        .map_err(api_error("Failed to delete category"))?;
    println!("Category {} deleted", args.id);
    Ok(())
}
