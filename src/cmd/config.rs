use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_ID, StoredConfig,
    config_file_path, validate_base_url, validate_model_name,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring escriba.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt("Gemini API key", &mut cfg.gemini_api_key, true)?;
    apply_checked_prompt(
        &format!("Gemini model (default {DEFAULT_MODEL})"),
        &mut cfg.gemini_model,
        validate_model_name,
    )?;
    apply_checked_prompt(
        &format!("Gemini API base URL (default {DEFAULT_BASE_URL})"),
        &mut cfg.gemini_base_url,
        validate_base_url,
    )?;

    let mut timeout = cfg.timeout_secs.map(|secs| secs.to_string());
    apply_prompt(
        &format!("Request timeout in seconds (default {DEFAULT_TIMEOUT_SECS})"),
        &mut timeout,
        false,
    )?;
    cfg.timeout_secs = match timeout {
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(secs),
            _ => {
                eprintln!("Warning: '{value}' is not a positive number; keeping the default.");
                None
            }
        },
        None => None,
    };

    apply_prompt(
        &format!("User id for saved drafts (default {DEFAULT_USER_ID})"),
        &mut cfg.user_id,
        false,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Gemini API key: {}", mask_secret(&cfg.gemini_api_key));
    println!("Gemini model: {}", display_value(&cfg.gemini_model));
    println!("Gemini base URL: {}", display_value(&cfg.gemini_base_url));
    println!(
        "Request timeout: {}",
        display_value(&cfg.timeout_secs.map(|secs| format!("{secs}s")))
    );
    println!("User id: {}", display_value(&cfg.user_id));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

/// Like `apply_prompt`, but a rejected answer leaves the old value in place.
fn apply_checked_prompt(
    field: &str,
    target: &mut Option<String>,
    check: fn(&str) -> AppResult<()>,
) -> AppResult<()> {
    let action = prompt(field, target.as_deref(), false)?;
    if let Err(err) = action.check(check) {
        eprintln!("Warning: {err}; keeping the previous value.");
        return Ok(());
    }
    match action {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }

    fn check(&self, check: fn(&str) -> AppResult<()>) -> AppResult<()> {
        match self {
            PromptAction::Set(value) => check(value),
            PromptAction::Keep | PromptAction::Clear => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_and_short_secrets() {
        assert_eq!(
            mask_secret(&Some("AIzaSyExample123".to_string())),
            "AIz***123"
        );
        assert_eq!(mask_secret(&Some("abc".to_string())), "***");
        assert_eq!(mask_secret(&None), "<not set>");
    }

    #[test]
    fn parses_prompt_answers() {
        assert_eq!(PromptAction::parse("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::parse(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::parse("gemini-pro\n"),
            PromptAction::Set("gemini-pro".to_string())
        );
    }

    #[test]
    fn checked_answers_reject_bad_values() {
        let bad = PromptAction::parse("gemini flash\n");
        assert!(bad.check(validate_model_name).is_err());

        let good = PromptAction::parse("gemini-2.5-pro\n");
        assert!(good.check(validate_model_name).is_ok());

        assert!(PromptAction::Clear.check(validate_base_url).is_ok());
        assert!(
            PromptAction::parse("localhost:8080")
                .check(validate_base_url)
                .is_err()
        );
    }
}
