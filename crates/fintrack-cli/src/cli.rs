//! Argument parsing and command dispatch.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fintrack_api_models::{RecordId, ReportPeriod, TransactionType};
use fintrack_config::{ConfigOverrides, LogFormatSetting, load_config};
use fintrack_telemetry::{LogFormat, LoggingConfig, build_sha, init_logging};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, default_session_path};
use crate::commands::auth::{handle_login, handle_logout, handle_register, handle_whoami};
use crate::commands::categories::{
    handle_category_add, handle_category_list, handle_category_remove, handle_category_rename,
};
use crate::commands::profile::{handle_profile_show, handle_profile_update};
use crate::commands::reports::{handle_report_chart, handle_report_summary};
use crate::commands::transactions::{
    handle_transaction_add, handle_transaction_edit, handle_transaction_list,
    handle_transaction_remove, handle_transaction_show,
};

const BUILD_SHA: &str = match option_env!("FINTRACK_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command, and reports
/// failures on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let trace_id = Uuid::new_v4().to_string();

    match execute(cli, &trace_id).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli, trace_id: &str) -> CliResult<()> {
    let overrides = ConfigOverrides {
        api_url: cli.api_url,
        log_level: cli.log_level,
        log_format: cli.log_format,
    };
    let config = load_config(cli.config.as_deref(), &overrides)?;

    init_logging(&LoggingConfig {
        level: &config.logging.level,
        format: match config.logging.format {
            LogFormatSetting::Pretty => LogFormat::Pretty,
            LogFormatSetting::Json => LogFormat::Json,
        },
        build_sha: BUILD_SHA,
    })
    .map_err(CliError::failure)?;

    let session_file = cli.session_file.unwrap_or_else(default_session_path);
    tracing::debug!(
        trace_id,
        api_url = %config.api.base_url,
        session_file = %session_file.display(),
        "starting command"
    );

    let reset_corrupt_session = cli.command.replaces_session();
    let mut ctx =
        AppContext::from_config(&config, &session_file, trace_id, reset_corrupt_session)?;
    dispatch(cli.command, &mut ctx, cli.output)
        .instrument(tracing::info_span!("fintrack", build_sha = %build_sha(), trace_id))
        .await
}

async fn dispatch(command: Command, ctx: &mut AppContext, output: OutputFormat) -> CliResult<()> {
    match command {
        Command::Login(args) => handle_login(ctx, args).await,
        Command::Register(args) => handle_register(ctx, args).await,
        Command::Logout => handle_logout(ctx),
        Command::Whoami => handle_whoami(ctx, output),
        Command::Profile(profile) => match profile {
            ProfileCommand::Show => handle_profile_show(ctx, output).await,
            ProfileCommand::Update(args) => handle_profile_update(ctx, args).await,
        },
        Command::Tx(transactions) => match transactions {
            TransactionCommand::Ls => handle_transaction_list(ctx, output).await,
            TransactionCommand::Show(args) => handle_transaction_show(ctx, args, output).await,
            TransactionCommand::Add(args) => handle_transaction_add(ctx, args).await,
            TransactionCommand::Edit(args) => handle_transaction_edit(ctx, args).await,
            TransactionCommand::Rm(args) => handle_transaction_remove(ctx, args).await,
        },
        Command::Category(categories) => match categories {
            CategoryCommand::Ls => handle_category_list(ctx, output).await,
            CategoryCommand::Add(args) => handle_category_add(ctx, args).await,
            CategoryCommand::Rename(args) => handle_category_rename(ctx, args).await,
            CategoryCommand::Rm(args) => handle_category_remove(ctx, args).await,
        },
        Command::Report(report) => match report {
            ReportCommand::Summary(args) => handle_report_summary(ctx, args, output).await,
            ReportCommand::Chart(args) => handle_report_chart(ctx, args, output).await,
        },
    }
}

#[derive(Parser)]
#[command(
    name = "fintrack",
    about = "Command-line client for the Fintrack personal finance service"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "FINTRACK_API_URL",
        help = "Backend origin (defaults to the config file, then http://localhost:8080)"
    )]
    api_url: Option<String>,
    #[arg(long, global = true, env = "FINTRACK_CONFIG", help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "FINTRACK_SESSION_FILE",
        help = "Where the login session is kept (defaults to ~/.fintrack/session.json)"
    )]
    session_file: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(long, global = true, help = "Log filter used when RUST_LOG is unset")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Log output format: pretty or json")]
    log_format: Option<LogFormatSetting>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Log in and remember the session.
    Login(LoginArgs),
    /// Create an account and log in.
    Register(RegisterArgs),
    /// Forget the current session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// View or change the profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage transactions.
    #[command(subcommand)]
    Tx(TransactionCommand),
    /// Manage categories.
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Income/expense reports.
    #[command(subcommand)]
    Report(ReportCommand),
}

impl Command {
    /// Commands that overwrite the stored session may start from a corrupt one.
    const fn replaces_session(&self) -> bool {
        matches!(self, Self::Login(_) | Self::Register(_) | Self::Logout)
    }
}

#[derive(Subcommand)]
pub(crate) enum ProfileCommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Subcommand)]
pub(crate) enum TransactionCommand {
    Ls,
    Show(TransactionIdArgs),
    Add(TransactionAddArgs),
    Edit(TransactionEditArgs),
    Rm(TransactionRemoveArgs),
}

#[derive(Subcommand)]
pub(crate) enum CategoryCommand {
    Ls,
    Add(CategoryAddArgs),
    Rename(CategoryRenameArgs),
    Rm(CategoryRemoveArgs),
}

#[derive(Subcommand)]
pub(crate) enum ReportCommand {
    Summary(ReportArgs),
    Chart(ReportArgs),
}

#[derive(Args, Default)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long, env = "FINTRACK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, help = "Three-letter currency code, e.g. USD")]
    pub(crate) currency: String,
    #[arg(long, env = "FINTRACK_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args)]
pub(crate) struct ProfileUpdateArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) currency: String,
}

#[derive(Args)]
pub(crate) struct TransactionIdArgs {
    #[arg(help = "Transaction identifier")]
    pub(crate) id: RecordId,
}

#[derive(Args)]
pub(crate) struct TransactionRemoveArgs {
    #[arg(help = "Transaction identifier")]
    pub(crate) id: RecordId,
    #[arg(long, short = 'y', help = "Delete without asking for confirmation")]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct TransactionAddArgs {
    #[arg(long = "type", help = "income or expense")]
    pub(crate) kind: TransactionType,
    #[arg(long)]
    pub(crate) amount: f64,
    #[arg(long, help = "Category identifier")]
    pub(crate) category: RecordId,
    #[arg(long, help = "Booking date (YYYY-MM-DD), defaults to today")]
    pub(crate) date: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Default)]
pub(crate) struct TransactionEditArgs {
    #[arg(help = "Transaction identifier")]
    pub(crate) id: RecordId,
    #[arg(long = "type", help = "income or expense")]
    pub(crate) kind: Option<TransactionType>,
    #[arg(long)]
    pub(crate) amount: Option<f64>,
    #[arg(long, help = "Category identifier")]
    pub(crate) category: Option<RecordId>,
    #[arg(long, help = "Booking date (YYYY-MM-DD)")]
    pub(crate) date: Option<NaiveDate>,
    #[arg(long, help = "New description; pass an empty string to clear it")]
    pub(crate) description: Option<String>,
}

#[derive(Args)]
pub(crate) struct CategoryAddArgs {
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct CategoryRenameArgs {
    #[arg(help = "Category identifier")]
    pub(crate) id: RecordId,
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct CategoryRemoveArgs {
    #[arg(help = "Category identifier")]
    pub(crate) id: RecordId,
    #[arg(long, short = 'y', help = "Delete without asking for confirmation")]
    pub(crate) yes: bool,
}

#[derive(Args)]
pub(crate) struct ReportArgs {
    #[arg(help = "YYYY for a whole year or YYYY-MM for one month")]
    pub(crate) period: ReportPeriod,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_transaction_add() {
        let cli = Cli::try_parse_from([
            "fintrack",
            "--output",
            "json",
            "tx",
            "add",
            "--type",
            "expense",
            "--amount",
            "12.50",
            "--category",
            "3",
            "--date",
            "2024-03-05",
        ])
        .expect("valid arguments");
        assert_eq!(cli.output, OutputFormat::Json);
        let Command::Tx(TransactionCommand::Add(args)) = cli.command else {
            panic!("expected tx add");
        };
        assert_eq!(args.kind, TransactionType::Expense);
        assert_eq!(args.category, 3);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn parses_report_period() {
        let cli = Cli::try_parse_from(["fintrack", "report", "summary", "2024-03"])
            .expect("valid arguments");
        let Command::Report(ReportCommand::Summary(args)) = cli.command else {
            panic!("expected report summary");
        };
        assert_eq!(args.period, ReportPeriod::Month { year: 2024, month: 3 });
    }

    #[test]
    fn rejects_malformed_period_and_type() {
        assert!(Cli::try_parse_from(["fintrack", "report", "chart", "2024-13"]).is_err());
        assert!(
            Cli::try_parse_from([
                "fintrack", "tx", "add", "--type", "gift", "--amount", "1", "--category", "1"
            ])
            .is_err()
        );
    }

    #[test]
    fn session_replacing_commands() {
        let parse = |args: &[&str]| Cli::try_parse_from(args).expect("valid arguments").command;
        assert!(parse(&["fintrack", "logout"]).replaces_session());
        assert!(parse(&["fintrack", "login", "--email", "a@b.c"]).replaces_session());
        assert!(!parse(&["fintrack", "whoami"]).replaces_session());

        let Command::Tx(TransactionCommand::Rm(args)) = parse(&["fintrack", "tx", "rm", "4", "-y"])
        else {
            panic!("expected tx rm");
        };
        assert!(args.yes);
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "fintrack",
            "category",
            "ls",
            "--api-url",
            "http://example.test",
            "--log-format",
            "json",
        ])
        .expect("valid arguments");
        assert_eq!(cli.api_url.as_deref(), Some("http://example.test"));
        assert_eq!(cli.log_format, Some(LogFormatSetting::Json));
    }
}
