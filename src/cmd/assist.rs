use std::io::{self, Read};

use crate::domain::operation::{OperationRequest, OperationResult};
use crate::error::AppResult;
use crate::workflow::session::validate_input;
use crate::workflow::text_operation::TextOperationService;

#[derive(Debug, Clone)]
pub struct AssistCommandArgs {
    pub request: OperationRequest,
    pub json: bool,
}

pub async fn run(
    service: &TextOperationService,
    args: AssistCommandArgs,
) -> AppResult<OperationResult> {
    validate_input(&args.request.text)?;
    let result = service.execute(&args.request).await;
    print_result(&result, args.json)?;
    Ok(result)
}

/// Joins the positional words, or reads stdin when none were given.
pub fn collect_text(words: Vec<String>) -> AppResult<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn print_result(result: &OperationResult, json: bool) -> AppResult<()> {
    if json {
        let rendered = serde_json::to_string_pretty(result).map_err(io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    match result {
        OperationResult::Success { output } => println!("{output}"),
        OperationResult::Failure { error_message } => eprintln!("{error_message}"),
    }
    Ok(())
}
