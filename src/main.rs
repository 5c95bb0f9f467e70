mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::list_cmd::ListArgs;
use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::config::AppConfig;
use crate::core::lifecycle::Action;

#[derive(Parser)]
#[command(name = "pkw", about = "Parking reservation charges and extension eligibility", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the charge for a reservation and whether it can be extended
    Estimate {
        /// Reservation ID to fetch from the backend
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        id: Option<String>,

        /// Read the reservation from a JSON bundle instead
        #[arg(long)]
        file: Option<PathBuf>,

        /// Evaluate as of this instant (RFC 3339) instead of now
        #[arg(long)]
        at: Option<String>,
    },
    /// List reservations with estimated charges
    List(ListArgs),
    /// Extend a confirmed reservation by the lot's extension step
    Extend { id: String },
    /// Cancel a confirmed reservation
    Cancel { id: String },
    /// Check in to a confirmed reservation
    CheckIn { id: String },
    /// Check out of a checked-in reservation
    CheckOut { id: String },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "warn,pkw=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn output_options(cli: &Cli, config: &AppConfig) -> OutputOptions {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        let requested = cli
            .format
            .as_deref()
            .unwrap_or(&config.settings.default_format);
        OutputFormat::from_setting(requested).unwrap_or(OutputFormat::Text)
    };
    OutputOptions {
        format,
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color, &config.settings.color),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default config");
        AppConfig::default()
    });
    let output_opts = output_options(&cli, &config);

    match cli.command {
        Commands::Estimate { id, file, at } => {
            cli::estimate_cmd::run(id, file, at, &config, &output_opts).await?
        }
        Commands::List(args) => cli::list_cmd::run(args, &config, &output_opts).await?,
        Commands::Extend { id } => {
            cli::action_cmd::run(&id, Action::Extend, &config, &output_opts).await?
        }
        Commands::Cancel { id } => {
            cli::action_cmd::run(&id, Action::Cancel, &config, &output_opts).await?
        }
        Commands::CheckIn { id } => {
            cli::action_cmd::run(&id, Action::CheckIn, &config, &output_opts).await?
        }
        Commands::CheckOut { id } => {
            cli::action_cmd::run(&id, Action::CheckOut, &config, &output_opts).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::Show => cli::config_cmd::show(&config, &output_opts)?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn estimate_requires_id_or_file() {
        assert!(Cli::try_parse_from(["pkw", "estimate"]).is_err());
        assert!(Cli::try_parse_from(["pkw", "estimate", "12"]).is_ok());
        assert!(Cli::try_parse_from(["pkw", "estimate", "--file", "b.json"]).is_ok());
        assert!(Cli::try_parse_from(["pkw", "estimate", "12", "--file", "b.json"]).is_err());
    }

    #[test]
    fn json_flag_beats_config_format() {
        let cli = Cli::try_parse_from(["pkw", "-j", "list"]).unwrap();
        let opts = output_options(&cli, &AppConfig::default());
        assert_eq!(opts.format, OutputFormat::Json);

        let cli = Cli::try_parse_from(["pkw", "list", "--status", "confirmed"]).unwrap();
        let mut config = AppConfig::default();
        config.settings.default_format = "json".to_string();
        assert_eq!(output_options(&cli, &config).format, OutputFormat::Json);
    }

    #[test]
    fn command_names_are_kebab_case() {
        assert!(Cli::try_parse_from(["pkw", "check-in", "7"]).is_ok());
        assert!(Cli::try_parse_from(["pkw", "check-out", "7"]).is_ok());
        assert!(Cli::try_parse_from(["pkw", "config", "show"]).is_ok());
    }
}
