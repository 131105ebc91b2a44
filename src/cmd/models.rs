use crate::config::AppConfig;
use crate::error::AppResult;
use crate::infra::llm::GeminiClient;

pub async fn run(config: &AppConfig) -> AppResult<()> {
    let client = GeminiClient::new(&config.backend_config()?)?;
    let models = client.list_models().await?;
    let configured = client.model().trim_start_matches("models/");

    println!("Available models:\n");
    for model in &models {
        let marker = if model.name.trim_start_matches("models/") == configured {
            " (configured)"
        } else {
            ""
        };
        println!("  - {}{marker}", model.name);
        if model.supports_generation {
            println!("    supports generateContent");
        }
    }

    Ok(())
}
