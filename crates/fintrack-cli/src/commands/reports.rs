use fintrack_api_models::ReportPeriod;
use fintrack_client::format::{chart_colors, random_base_hue};

use crate::cli::{OutputFormat, ReportArgs};
use crate::client::{AppContext, CliError, CliResult, api_error};
use crate::output::{render_chart, render_summary};

pub(crate) async fn handle_report_summary(
    ctx: &AppContext,
    args: ReportArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let user = ctx.user()?;
    let summary = ctx
        .api
        .summary(user.id, args.period)
        .await
        .map_err(api_error("Failed to load summary"))?;
    render_summary(&summary, args.period, ctx.currency(), format)
}

pub(crate) async fn handle_report_chart(
    ctx: &AppContext,
    args: ReportArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let ReportPeriod::Month { year, month } = args.period else {
        return Err(CliError::validation(
            "the category chart covers a single month; pass YYYY-MM",
        ));
    };
    let user = ctx.user()?;
    let chart = ctx
        .api
        .category_chart(user.id, year, month)
        .await
        .map_err(api_error("Failed to load chart data"))?;

    let count = chart.labels.len().min(chart.values.len());
    let colors = chart_colors(count, &ctx.presentation.chart_palette, random_base_hue());
    render_chart(&chart, &colors, args.period, ctx.currency(), format)
}
