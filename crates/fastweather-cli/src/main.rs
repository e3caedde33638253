mod format;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fastweather_core::{AppError, Config};
use fastweather_query::{ClientSettings, WeatherQueryClient, WeatherSession};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "fastweather")]
#[command(author, version, about = "Current weather and air quality for a city", long_about = None)]
struct Cli {
    /// City to look up; several words are joined with spaces
    #[arg(required = true)]
    city: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// API key for the generative API (overrides the config file)
    #[arg(long, env = "FASTWEATHER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name (overrides the config file)
    #[arg(long)]
    model: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(key) = &self.api_key {
            config.api.api_key = key.clone();
        }
        if let Some(model) = &self.model {
            config.api.model = model.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("Command failed: {:#}", e);
            eprintln!("{}", e.user_message());
            if let AppError::Config(detail) = &e {
                eprintln!("  {}", detail);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, AppError> {
    fastweather_core::init_with_level(if cli.verbose { "debug" } else { "warn" })?;

    let mut config = Config::load()
        .context("Failed to load configuration")
        .map_err(AppError::from_anyhow)?;
    cli.apply_overrides(&mut config);

    config.ensure_valid()?;

    let client = WeatherQueryClient::new(ClientSettings::from(&config))?;
    let session = WeatherSession::new(Arc::new(client));

    let city = cli.city.join(" ");
    eprintln!("Fetching weather for {}...", city.trim());

    let result = session.query(&city).await?;
    let rendered = match cli.format {
        OutputFormat::Text => format::render_text(&result),
        OutputFormat::Json => format::render_json(&result)?,
    };
    println!("{}", rendered);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_city_words_are_joined() {
        let cli = Cli::try_parse_from(["fastweather", "New", "York"]).unwrap();
        assert_eq!(cli.city.join(" "), "New York");
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_city_is_required() {
        assert!(Cli::try_parse_from(["fastweather"]).is_err());
    }

    #[test]
    fn test_bad_override_is_config_error() {
        let cli = Cli::try_parse_from(["fastweather", "--base-url", "ftp://nope", "Lima"]).unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        let err = AppError::from(config.ensure_valid().unwrap_err());
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.user_message(), "Invalid configuration. Check your settings.");
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::try_parse_from([
            "fastweather",
            "--format",
            "json",
            "--model",
            "gemini-x",
            "--base-url",
            "http://localhost:8080",
            "Lima",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(config.api.model, "gemini-x");
        assert_eq!(config.api.base_url, "http://localhost:8080");
    }
}
