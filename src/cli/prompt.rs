//! Interactive query loop.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the prompt drives repeated `Forecaster` queries from stdin
//!
//! The loop never fails on bad answers: invalid choices and core errors are
//! printed and the question is asked again. EOF or `q` ends the session.

use std::io::{BufRead, Write};

use crate::domain::ProviderId;
use crate::error::{AppError, ForecastError};
use crate::forecast::Forecaster;
use crate::report::{format_projection, format_provider_menu, format_rate_line};

/// Run the prompt loop until the user quits or input ends.
pub fn run_session<R: BufRead, W: Write>(forecaster: &Forecaster, input: &mut R, out: &mut W) -> Result<(), AppError> {
    let providers = forecaster.list_providers();
    if providers.is_empty() {
        return Err(AppError::new(3, "No providers found in the billing history."));
    }

    loop {
        let Some(provider) = ask_provider(providers, input, out)? else {
            return Ok(());
        };

        match forecaster.get_provider_rate(provider) {
            Ok(rate) => say(out, &format_rate_line(provider, rate))?,
            Err(err) => {
                say(out, &err.to_string())?;
                continue;
            }
        }

        if !ask_month_and_project(forecaster, provider, input, out)? {
            return Ok(());
        }

        let Some(again) = ask(input, out, "Do another (y=yes, n=no)? ")? else {
            return Ok(());
        };
        if again.eq_ignore_ascii_case("n") || again.eq_ignore_ascii_case("q") {
            return Ok(());
        }
    }
}

fn ask_provider<'a, R: BufRead, W: Write>(
    providers: &'a [ProviderId],
    input: &mut R,
    out: &mut W,
) -> Result<Option<&'a ProviderId>, AppError> {
    loop {
        say(out, format_provider_menu(providers).trim_end())?;
        let prompt = format!("Who is your provider (1-{}, q to quit)? ", providers.len());
        let Some(answer) = ask(input, out, &prompt)? else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match answer.parse::<usize>() {
            Ok(choice) if (1..=providers.len()).contains(&choice) => return Ok(Some(&providers[choice - 1])),
            _ => say(
                out,
                &format!("Invalid choice: {answer}. Enter a number between 1 and {}.", providers.len()),
            )?,
        }
    }
}

/// Returns `false` when input ended or the user quit.
fn ask_month_and_project<R: BufRead, W: Write>(
    forecaster: &Forecaster,
    provider: &ProviderId,
    input: &mut R,
    out: &mut W,
) -> Result<bool, AppError> {
    loop {
        let Some(answer) = ask(input, out, "Month (1-12)? ")? else {
            return Ok(false);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(false);
        }

        let Ok(month) = answer.parse::<u32>() else {
            say(out, &format!("Invalid month: {answer}. Enter a number between 1 and 12."))?;
            continue;
        };

        let projection = forecaster
            .month_stat(month)
            .and_then(|stat| Ok((stat, forecaster.project_for_month(provider, month)?)));
        match projection {
            Ok((stat, p)) => {
                say(out, format_projection(stat, &p).trim_end())?;
                return Ok(true);
            }
            Err(err @ ForecastError::InvalidMonth(_)) => say(out, &err.to_string())?,
            Err(err) => {
                say(out, &err.to_string())?;
                return Ok(true);
            }
        }
    }
}

/// Print `prompt` and read one trimmed line; `None` on EOF.
fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<Option<String>, AppError> {
    write!(out, "{prompt}").map_err(write_err)?;
    out.flush().map_err(write_err)?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn say<W: Write>(out: &mut W, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}").map_err(write_err)
}

fn write_err(e: std::io::Error) -> AppError {
    AppError::new(2, format!("Failed to write prompt: {e}"))
}
