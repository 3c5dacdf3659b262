use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analysis::{Daypart, Radius};
use crate::config::{get_config_path, Config, ProviderConfig, ProviderKind, SearchDefaults};
use crate::provider::DEFAULT_API_KEY_ENV;
use crate::scoring::{PriceTier, ScoringConfig};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Re-prompt until the answer parses.
fn prompt_parsed<T>(message: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    loop {
        let input = prompt_with_default(message, default)?;
        match input.parse::<T>() {
            Ok(v) => return Ok(v),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Serialize `config` as YAML and replace `path` atomically.
pub(crate) fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;
    Ok(())
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("BizMap Configuration Wizard");
    println!("===========================");
    println!();

    // 1. Provider
    println!("Data provider: 'fixture' uses built-in sample data, 'places' queries");
    println!("the Google Geocoding and Places APIs for live competitor counts.");
    let kind = loop {
        let input = prompt_with_default("Provider (fixture/places)", "fixture")?;
        match input.to_lowercase().as_str() {
            "fixture" => break ProviderKind::Fixture,
            "places" => break ProviderKind::Places,
            _ => println!("  Invalid: use 'fixture' or 'places'. Try again."),
        }
    };

    let mut provider = ProviderConfig {
        kind,
        ..Default::default()
    };

    if kind == ProviderKind::Places {
        println!();
        println!(
            "The API key can come from the {} environment variable or be stored in the config.",
            DEFAULT_API_KEY_ENV
        );
        if prompt_yes_no("Store an API key in the config file?", false)? {
            let key = rpassword::prompt_password("Google API key: ")
                .context("Failed to read API key from stdin")?;
            let key = key.trim();
            if key.is_empty() {
                anyhow::bail!("API key cannot be empty");
            }
            provider.api_key = Some(key.to_string());
        }
        provider.cache_ttl = loop {
            let input = prompt_with_default("Cache lookups for", "24h")?;
            match humantime::parse_duration(&input) {
                Ok(_) => break input,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
    }

    // 2. Scoring
    println!();
    let mut scoring = ScoringConfig::default();
    println!("The competitor scale controls how quickly nearby competitors drag the");
    println!("score down. Larger values make each extra competitor cost less.");
    scoring.c_scale = loop {
        let value: f64 = prompt_parsed("Competitor scale", "5")?;
        if value.is_finite() && value > 0.0 {
            break value;
        }
        println!("  Invalid: must be a positive number. Try again.");
    };

    // 3. Search defaults
    println!();
    println!("Defaults used when a search doesn't say otherwise.");
    let defaults = SearchDefaults {
        radius: prompt_parsed::<Radius>("Search radius (0.5 mile / 1 mile / 3 miles)", "1 mile")?,
        price_tier: prompt_parsed::<PriceTier>("Price tier (budget/mid/premium)", "mid")?,
        daypart: prompt_parsed::<Daypart>("Operating hours (day/evening/both)", "both")?,
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        scoring: Some(scoring),
        provider,
        defaults,
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `bizmap analyze --business \"coffee shop\" --location \"Providence, RI\"` to get started.");

    Ok(())
}
