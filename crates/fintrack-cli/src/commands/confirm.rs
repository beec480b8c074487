//! Confirmation prompt for destructive commands.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::anyhow;

use crate::client::{CliError, CliResult};

/// Ask `question` on the terminal unless `assume_yes` is set.
///
/// Returns `false` when the user declines; refuses to guess when stdin is
/// not a terminal.
pub(crate) fn confirm_removal(question: &str, assume_yes: bool) -> CliResult<bool> {
    if assume_yes {
        return Ok(true);
    }
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    ask(question, interactive, &mut stdin.lock(), &mut io::stdout())
}

fn ask(
    question: &str,
    interactive: bool,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> CliResult<bool> {
    if !interactive {
        return Err(CliError::validation(
            "confirmation required; pass --yes when running non-interactively",
        ));
    }
    write!(output, "{question} [y/N] ")
        .and_then(|()| output.flush())
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|err| CliError::failure(anyhow!("failed to read from stdin: {err}")))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
