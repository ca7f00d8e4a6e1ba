use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use skycard_core::{
    Config, ProviderId, ResponseCache, WeatherService, generator_from_config, provider_from_config,
};
use tracing::{debug, warn};

use crate::render::{render_comparison, render_report};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycard", version, about = "Weather cards with comfort scores, alerts and travel advice")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "openweather" or "gemini".
        provider: String,
    },

    /// Show the weather card for a city.
    Show {
        /// City name, optionally with country code, e.g. "Paris,FR".
        city: String,
    },

    /// Compare the weather in two cities.
    Compare {
        city_a: String,
        city_b: String,
    },

    /// Look up cities one after another, sharing one advice cache.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        debug!(command = ?self.command, "running command");

        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { city } => {
                let service = build_service()?;
                let report = service
                    .report(&city)
                    .await
                    .with_context(|| format!("Weather for '{city}' is unavailable"))?;
                println!("{}", render_report(&report));
                Ok(())
            }
            Command::Compare { city_a, city_b } => {
                let service = build_service()?;
                let comparison = service
                    .compare(&city_a, &city_b)
                    .await
                    .with_context(|| format!("Could not compare '{city_a}' and '{city_b}'"))?;
                println!("{}", render_comparison(&comparison));
                Ok(())
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    // Read the file alone so environment overrides are not persisted.
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = Password::new(&format!("{id} API key:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved {id} API key to {}", path.display());
    Ok(())
}

fn build_service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let generator = generator_from_config(&config);
    if let Some(notice) = advice_notice(&config) {
        eprintln!("{notice}\n");
    }

    Ok(WeatherService::new(provider, generator, ResponseCache::new()))
}

/// Tells the user why travel advice and verdicts are missing from the cards.
fn advice_notice(config: &Config) -> Option<String> {
    (!config.is_provider_configured(ProviderId::Gemini)).then(|| {
        format!(
            "Travel advice is disabled: no {} API key. Run `skycard configure gemini` to enable it.",
            ProviderId::Gemini
        )
    })
}

async fn interactive() -> anyhow::Result<()> {
    let service = build_service()?;

    loop {
        let input = Text::new("City:")
            .with_help_message("Empty input or Esc to quit")
            .prompt_skippable()
            .context("Failed to read city")?;

        let city = match input.as_deref().map(str::trim) {
            Some(city) if !city.is_empty() => city.to_string(),
            _ => break,
        };

        match service.report(&city).await {
            Ok(report) => println!("{}\n", render_report(&report)),
            Err(err) => {
                warn!(error = %err, %city, "report failed");
                eprintln!("Weather for '{city}' is unavailable: {err}\n");
            }
        }
    }

    Ok(())
}
