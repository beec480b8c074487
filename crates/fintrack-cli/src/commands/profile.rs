use fintrack_api_models::ProfileUpdate;

use crate::cli::{OutputFormat, ProfileUpdateArgs};
use crate::client::{AppContext, CliResult, api_error};
use crate::output::render_user;

pub(crate) async fn handle_profile_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let user = ctx.user()?;
    let profile = ctx
        .api
        .profile(user.id)
        .await
        .map_err(api_error("Failed to load profile data"))?;
    render_user(&profile, format)
}

pub(crate) async fn handle_profile_update(
    ctx: &mut AppContext,
    args: ProfileUpdateArgs,
) -> CliResult<()> {
    let user = ctx.user()?;
    let update = ProfileUpdate::new(user.id, &args.name, &args.currency)?;

    let updated = ctx
        .api
        .update_profile(user.id, &update)
        .await
        .map_err(api_error("Failed to update profile"))?;
    ctx.session.apply_profile(&updated)?;
    println!("Profile updated successfully!");
    Ok(())
}
