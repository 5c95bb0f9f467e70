use anyhow::Result;

use crate::cli::output::OutputOptions;
use crate::core::config::AppConfig;

pub fn init(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if path.exists() {
        eprintln!("Config file already exists at {}", path.display());
        eprintln!("Remove it first if you want to regenerate.");
        return Ok(());
    }

    match AppConfig::default().save() {
        Ok(path) => {
            println!("Generated config at {}", path.display());
            println!("  Set [api].base_url (or PARKWISE_API_URL) before fetching reservations.");
        }
        Err(e) => {
            eprintln!("Failed to generate config: {}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

pub fn check(_opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    if !path.exists() {
        eprintln!("No config file found at {}", path.display());
        eprintln!("Run `pkw config init` to create one.");
        return Ok(());
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let issues = config.validate();
    if issues.is_empty() {
        println!("Config is valid: {}", path.display());
        match &config.api.base_url {
            Some(url) => println!("  API: {}", url),
            None => println!("  No API base URL set."),
        }
        println!("  Timezone: {}", config.settings.timezone);
    } else {
        eprintln!("Config issues found in {}:", path.display());
        for issue in &issues {
            eprintln!("  - {}", issue);
        }
        std::process::exit(1);
    }
    Ok(())
}

/// Effective configuration (file plus environment) with the token masked.
pub fn show(config: &AppConfig, _opts: &OutputOptions) -> Result<()> {
    println!("# {}", AppConfig::config_path().display());
    print!("{}", toml::to_string_pretty(&masked(config))?);
    Ok(())
}

fn masked(config: &AppConfig) -> AppConfig {
    let mut shown = config.clone();
    shown.api.token = shown.api.token.as_deref().map(mask_token);
    shown
}

fn mask_token(token: &str) -> String {
    let visible: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    if token.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("****{}", visible)
    }
}
