//! Login, registration, logout, and session inspection.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::anyhow;
use fintrack_api_models::{LoginRequest, RegistrationRequest};

use crate::cli::{LoginArgs, OutputFormat, RegisterArgs};
use crate::client::{AppContext, CliError, CliResult, api_error};
use crate::output::render_session;

pub(crate) async fn handle_login(ctx: &mut AppContext, args: LoginArgs) -> CliResult<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = resolve_password(args.password)?;
    let credentials = LoginRequest::new(&email, &password)?;

    let user = ctx
        .api
        .login(&credentials)
        .await
        .map_err(api_error("Login failed"))?;
    let session = ctx.session.establish(&user)?;
    println!("Logged in as {} (id: {})", session.display_name(), session.id);
    Ok(())
}

pub(crate) async fn handle_register(ctx: &mut AppContext, args: RegisterArgs) -> CliResult<()> {
    let password = resolve_password(args.password)?;
    let registration = RegistrationRequest::new(&args.name, &args.email, &password, &args.currency)?;

    let user = ctx
        .api
        .register(&registration)
        .await
        .map_err(api_error("Registration failed"))?;
    let session = ctx.session.establish(&user)?;
    println!(
        "Account created; logged in as {} (id: {})",
        session.display_name(),
        session.id
    );
    Ok(())
}

pub(crate) fn handle_logout(ctx: &mut AppContext) -> CliResult<()> {
    ctx.session.clear()?;
    println!("Logged out");
    Ok(())
}

pub(crate) fn handle_whoami(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    render_session(&ctx.user()?, format)
}

pub(crate) fn resolve_password(provided: Option<String>) -> CliResult<String> {
    if let Some(value) = provided {
        return non_empty(value, "password");
    }

    if io::stdin().is_terminal() {
        let password = rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })?;
        non_empty(password, "password")
    } else {
        Err(CliError::validation(
            "password required; supply via --password or FINTRACK_PASSWORD when running non-interactively",
        ))
    }
}

fn prompt_line(label: &str) -> CliResult<String> {
    if !io::stdin().is_terminal() {
        return Err(CliError::validation(
            "email required; supply via --email when running non-interactively",
        ));
    }
    let mut stdout = io::stdout();
    write!(stdout, "{label}")
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| CliError::failure(anyhow!("failed to read from stdin: {err}")))?;
    non_empty(line, "email")
}

fn non_empty(value: String, field: &str) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CliError::validation(format!("{field} cannot be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}
