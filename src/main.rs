mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::assist::{self, AssistCommandArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::{models, session};
use crate::config::{AppConfig, Overrides};
use crate::domain::operation::{Operation, OperationRequest, Tone};
use crate::error::AppResult;
use crate::workflow::text_operation::TextOperationService;

#[derive(Parser)]
#[command(name = "escriba", author, version, about = "AI writing assistant for Spanish text")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Gemini API key; overrides GOOGLE_API_KEY and the config file.
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Model used for generation.
    #[arg(long, global = true)]
    model: Option<String>,
    /// User id attached to saved drafts.
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Correct grammar and spelling.
    Grammar(TextArgs),
    /// Rewrite text in another tone.
    Style(StyleArgs),
    /// Generate new content from a topic.
    Generate(TextArgs),
    /// Start an interactive session.
    Session,
    /// List models available to the configured key.
    Models,
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct TextArgs {
    /// Text to process; read from stdin when omitted.
    text: Vec<String>,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct StyleArgs {
    /// Tone to write in: formal, creative or casual.
    #[arg(short, long, default_value = "formal")]
    tone: String,
    #[command(flatten)]
    input: TextArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

/// Returns whether the command finished successfully.
async fn run() -> AppResult<bool> {
    let cli = Cli::parse();
    let overrides = Overrides {
        api_key: cli.global.api_key,
        model: cli.global.model,
        user_id: cli.global.user,
    };

    match cli.command {
        Commands::Config(args) => {
            config_cmd::run(args.command)?;
            Ok(true)
        }
        Commands::Session => {
            session::run(AppConfig::load(overrides)?).await?;
            Ok(true)
        }
        Commands::Models => {
            models::run(&AppConfig::load(overrides)?).await?;
            Ok(true)
        }
        Commands::Grammar(args) => {
            run_assist(overrides, Operation::FixGrammar, None, args).await
        }
        Commands::Style(args) => {
            let tone = Tone::from_label(&args.tone);
            run_assist(overrides, Operation::ImproveStyle, Some(tone), args.input).await
        }
        Commands::Generate(args) => {
            run_assist(overrides, Operation::GenerateContent, None, args).await
        }
    }
}

async fn run_assist(
    overrides: Overrides,
    operation: Operation,
    tone: Option<Tone>,
    args: TextArgs,
) -> AppResult<bool> {
    let config = AppConfig::load(overrides)?;
    let service = TextOperationService::new(&config.backend_config()?)?;

    let text = assist::collect_text(args.text)?;
    let mut request = OperationRequest::new(operation, text);
    if let Some(tone) = tone {
        request = request.with_tone(tone);
    }

    let result = assist::run(
        &service,
        AssistCommandArgs {
            request,
            json: args.json,
        },
    )
    .await?;

    Ok(result.success())
}
