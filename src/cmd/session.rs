use std::io::{self, BufRead, Write};
use std::sync::Arc;

use crate::config::{API_KEY_ENV, AppConfig};
use crate::context::AppContext;
use crate::domain::operation::{Operation, OperationRequest, OperationResult, Tone};
use crate::domain::session::Session;
use crate::error::{AppError, AppResult};
use crate::infra::console_store::ConsoleDraftStore;
use crate::workflow::session::{SaveOutcome, process_request, save_current_draft};
use crate::workflow::text_operation::TextOperationService;

const HELP: &str = "\
Commands:
  :grammar          fix grammar and spelling (default)
  :style [tone]     rewrite in a tone: formal, creative or casual
  :generate         write new content from a topic
  :save             save the current result as a draft
  :show             print the original text and current result
  :clear            forget the current result
  :help             show this help
  :quit             leave the session
Any other line is processed with the current mode. Wrap text spanning
several lines between two \"\"\" lines to send it as one request.";

const BLOCK_FENCE: &str = "\"\"\"";

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Mode(Operation, Option<Tone>),
    Process(String),
    Save,
    Show,
    Clear,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl SessionCommand {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return SessionCommand::Empty;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return SessionCommand::Process(trimmed.to_string());
        };

        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        match name.as_str() {
            "grammar" | "g" => SessionCommand::Mode(Operation::FixGrammar, None),
            "style" | "s" => {
                SessionCommand::Mode(Operation::ImproveStyle, words.next().map(Tone::from_label))
            }
            "generate" | "gen" => SessionCommand::Mode(Operation::GenerateContent, None),
            "save" => SessionCommand::Save,
            "show" => SessionCommand::Show,
            "clear" => SessionCommand::Clear,
            "help" | "h" | "?" => SessionCommand::Help,
            "quit" | "q" | "exit" => SessionCommand::Quit,
            _ => SessionCommand::Unknown(name),
        }
    }
}

/// Turns raw input lines into commands, joining fenced blocks into one text.
#[derive(Debug, Default)]
struct LineAssembler {
    block: Option<Vec<String>>,
}

impl LineAssembler {
    fn in_block(&self) -> bool {
        self.block.is_some()
    }

    fn feed(&mut self, line: &str) -> Option<SessionCommand> {
        if let Some(block) = self.block.as_mut() {
            match line.trim_end().strip_suffix(BLOCK_FENCE) {
                Some(head) => {
                    if !head.trim().is_empty() {
                        block.push(head.to_string());
                    }
                    return self.finish();
                }
                None => {
                    block.push(line.to_string());
                    return None;
                }
            }
        }

        let Some(rest) = line.trim().strip_prefix(BLOCK_FENCE) else {
            return Some(SessionCommand::parse(line));
        };
        if let Some(inner) = rest.strip_suffix(BLOCK_FENCE) {
            return Some(Self::block_command(vec![inner.to_string()]));
        }

        let mut block = Vec::new();
        if !rest.trim().is_empty() {
            block.push(rest.to_string());
        }
        self.block = Some(block);
        None
    }

    /// Closes an open block, e.g. when input ends before the closing fence.
    fn finish(&mut self) -> Option<SessionCommand> {
        self.block.take().map(Self::block_command)
    }

    fn block_command(lines: Vec<String>) -> SessionCommand {
        let text = lines.join("\n");
        let text = text.trim();
        if text.is_empty() {
            SessionCommand::Empty
        } else {
            SessionCommand::Process(text.to_string())
        }
    }
}

struct Mode {
    operation: Operation,
    tone: Tone,
}

impl Mode {
    fn label(&self) -> String {
        match self.operation {
            Operation::ImproveStyle => format!("style:{}", self.tone.as_str()),
            other => other.as_str().to_string(),
        }
    }

    fn request(&self, text: String) -> OperationRequest {
        let request = OperationRequest::new(self.operation, text);
        match self.operation {
            Operation::ImproveStyle => request.with_tone(self.tone),
            _ => request,
        }
    }
}

pub async fn run(config: AppConfig) -> AppResult<()> {
    let config = ensure_api_key(config)?;
    let service = TextOperationService::new(&config.backend_config()?)?;
    let ctx = AppContext::new(config, service, Arc::new(ConsoleDraftStore::stdout()));

    let mut session = Session::new();
    let mut mode = Mode {
        operation: Operation::FixGrammar,
        tone: Tone::default(),
    };

    println!("escriba session with model {}.", ctx.config.model);
    println!("{HELP}");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut assembler = LineAssembler::default();
    loop {
        if assembler.in_block() {
            print!("...> ");
        } else {
            print!("\n[{}]> ", mode.label());
        }
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            if let Some(command) = assembler.finish() {
                dispatch(&ctx, &mut session, &mut mode, command).await?;
            }
            break;
        };
        let Some(command) = assembler.feed(&line?) else {
            continue;
        };
        if !dispatch(&ctx, &mut session, &mut mode, command).await? {
            break;
        }
    }

    Ok(())
}

/// Applies one command. Returns `false` when the session should end.
async fn dispatch(
    ctx: &AppContext,
    session: &mut Session,
    mode: &mut Mode,
    command: SessionCommand,
) -> AppResult<bool> {
    match command {
        SessionCommand::Empty => {}
        SessionCommand::Mode(operation, tone) => {
            mode.operation = operation;
            if let Some(tone) = tone {
                mode.tone = tone;
            }
        }
        SessionCommand::Process(text) => {
            process_line(ctx, session, mode.request(text)).await?;
        }
        SessionCommand::Save => {
            match save_current_draft(session, ctx.drafts.as_ref(), &ctx.config.user_id) {
                SaveOutcome::Saved => println!("Draft saved."),
                SaveOutcome::Failed => eprintln!("Error: the draft could not be saved."),
                SaveOutcome::NothingToSave => {
                    eprintln!("Warning: nothing to save yet. Process some text first.")
                }
            }
        }
        SessionCommand::Show => print_session(session),
        SessionCommand::Clear => {
            session.clear();
            println!("Session cleared.");
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => return Ok(false),
        SessionCommand::Unknown(name) => {
            eprintln!("Unknown command ':{name}'. Type :help for the list.")
        }
    }

    Ok(true)
}

async fn process_line(
    ctx: &AppContext,
    session: &mut Session,
    request: OperationRequest,
) -> AppResult<()> {
    match process_request(&ctx.text_operations, session, &request).await {
        Ok(OperationResult::Success { output }) => {
            println!("\n--- Result ---\n{output}");
            Ok(())
        }
        Ok(OperationResult::Failure { error_message }) => {
            eprintln!("{error_message}");
            Ok(())
        }
        Err(AppError::Validation(message)) => {
            eprintln!("Warning: {message}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn print_session(session: &Session) {
    println!("Original text: {}", session.original_text);
    match session.current_result.as_deref() {
        Some(result) => println!("Current result:\n{result}"),
        None => println!("Current result: <none>"),
    }
}

fn ensure_api_key(config: AppConfig) -> AppResult<AppConfig> {
    if config.api_key.is_some() {
        return Ok(config);
    }

    let mut stdout = io::stdout();
    write!(stdout, "Gemini API key ({API_KEY_ENV} not set): ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let config = config.with_api_key(input);
    if config.api_key.is_none() {
        return Err(AppError::Configuration(
            "an API key is required to start a session".to_string(),
        ));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_processed() {
        assert_eq!(
            SessionCommand::parse("  hola mundo \n"),
            SessionCommand::Process("hola mundo".to_string())
        );
        assert_eq!(SessionCommand::parse("   "), SessionCommand::Empty);
    }

    #[test]
    fn parses_mode_switches() {
        assert_eq!(
            SessionCommand::parse(":grammar"),
            SessionCommand::Mode(Operation::FixGrammar, None)
        );
        assert_eq!(
            SessionCommand::parse(":style creativo"),
            SessionCommand::Mode(Operation::ImproveStyle, Some(Tone::Creative))
        );
        assert_eq!(
            SessionCommand::parse(":style"),
            SessionCommand::Mode(Operation::ImproveStyle, None)
        );
        assert_eq!(
            SessionCommand::parse(":GEN"),
            SessionCommand::Mode(Operation::GenerateContent, None)
        );
    }

    #[test]
    fn parses_session_actions() {
        assert_eq!(SessionCommand::parse(":save"), SessionCommand::Save);
        assert_eq!(SessionCommand::parse(":clear"), SessionCommand::Clear);
        assert_eq!(SessionCommand::parse(":q"), SessionCommand::Quit);
        assert_eq!(
            SessionCommand::parse(":nope"),
            SessionCommand::Unknown("nope".to_string())
        );
    }

    fn feed_all(assembler: &mut LineAssembler, input: &str) -> Vec<SessionCommand> {
        input.lines().filter_map(|line| assembler.feed(line)).collect()
    }

    #[test]
    fn fenced_block_becomes_one_request() {
        let mut assembler = LineAssembler::default();
        let commands = feed_all(&mut assembler, "\"\"\"\nhola como\nestas tu\n\"\"\"\n");
        assert_eq!(
            commands,
            vec![SessionCommand::Process("hola como\nestas tu".to_string())]
        );
        assert!(!assembler.in_block());
    }

    #[test]
    fn block_lines_are_text_not_commands() {
        let mut assembler = LineAssembler::default();
        let commands = feed_all(&mut assembler, "\"\"\"Querido:\n:save\n  gracias\"\"\"\n:save");
        assert_eq!(
            commands,
            vec![
                SessionCommand::Process("Querido:\n:save\n  gracias".to_string()),
                SessionCommand::Save,
            ]
        );
    }

    #[test]
    fn unfenced_lines_stay_separate() {
        let mut assembler = LineAssembler::default();
        let commands = feed_all(&mut assembler, "hola como\nestas tu\n");
        assert_eq!(
            commands,
            vec![
                SessionCommand::Process("hola como".to_string()),
                SessionCommand::Process("estas tu".to_string()),
            ]
        );
    }

    #[test]
    fn inline_and_empty_blocks() {
        let mut assembler = LineAssembler::default();
        assert_eq!(
            assembler.feed("\"\"\"una linea\"\"\""),
            Some(SessionCommand::Process("una linea".to_string()))
        );
        assert_eq!(assembler.feed("\"\"\"\"\"\""), Some(SessionCommand::Empty));
    }

    #[test]
    fn unterminated_block_is_flushed_at_end_of_input() {
        let mut assembler = LineAssembler::default();
        assert!(feed_all(&mut assembler, "\"\"\"\nprimera\nsegunda").is_empty());
        assert!(assembler.in_block());
        assert_eq!(
            assembler.finish(),
            Some(SessionCommand::Process("primera\nsegunda".to_string()))
        );
        assert_eq!(assembler.finish(), None);
    }

    #[test]
    fn style_mode_carries_tone() {
        let mode = Mode {
            operation: Operation::ImproveStyle,
            tone: Tone::Casual,
        };
        assert_eq!(mode.label(), "style:casual");
        assert_eq!(mode.request("x".to_string()).tone, Some(Tone::Casual));

        let mode = Mode {
            operation: Operation::FixGrammar,
            tone: Tone::Casual,
        };
        assert_eq!(mode.label(), "grammar");
        assert_eq!(mode.request("x".to_string()).tone, None);
    }
}
