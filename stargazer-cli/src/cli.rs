use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{CustomUserError, Text, validator::Validation};
use std::{
    fs,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use stargazer_core::{
    Config, Coordinate, DayGrouping, EventLayout, Forecaster, Notice, RenderOptions, RunOptions,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "stargazer", version, about = "Hourly stargazing forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Html,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location and contact details for api.weather.gov.
    Configure,

    /// Print where the config file lives.
    ConfigPath,

    /// Show the hourly forecast for a location.
    Show {
        /// Coordinates as "<latitude>, <longitude>"; defaults to the configured location.
        #[arg(allow_hyphen_values = true)]
        coordinates: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write the table to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only sunrise/sunset rows per day, no day titles or moon rows.
        #[arg(long)]
        compact: bool,

        /// Start a new day on every calendar date change instead of weekday change.
        #[arg(long)]
        calendar_days: bool,

        /// UTC offset in hours for the sun/moon lookup; defaults to this machine's offset.
        #[arg(long, allow_hyphen_values = true)]
        tz_offset: Option<f64>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config_path = self.config.as_deref();

        match self.command {
            Command::Configure => configure(config_path),
            Command::ConfigPath => {
                match config_path {
                    Some(path) => println!("{}", path.display()),
                    None => println!("{}", Config::config_file_path()?.display()),
                }
                Ok(())
            }
            Command::Show { coordinates, format, output, compact, calendar_days, tz_offset } => {
                let config = load_config(config_path)?;
                let options = RunOptions {
                    render: RenderOptions {
                        grouping: if calendar_days {
                            DayGrouping::CalendarDate
                        } else {
                            DayGrouping::Weekday
                        },
                        layout: if compact { EventLayout::Compact } else { EventLayout::Full },
                    },
                    utc_offset_hours: tz_offset,
                    ..RunOptions::default()
                };
                show(&config, coordinates, format, output, &options).await
            }
        }
    }
}

/// `--config` wins; otherwise the platform config file.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn show(
    config: &Config,
    coordinates: Option<String>,
    format: Format,
    target: Option<PathBuf>,
    options: &RunOptions,
) -> Result<()> {
    // The output file is emptied up front and only filled on success.
    if let Some(path) = &target {
        fs::write(path, "")
            .with_context(|| format!("Failed to clear output file: {}", path.display()))?;
    }

    let input = match coordinates {
        Some(raw) => raw,
        None => config.default_location.clone().unwrap_or_default(),
    };

    let forecaster = Forecaster::from_config(config)?;
    let report = forecaster.run(&input, options).await?;

    for notice in &report.notices {
        match notice {
            Notice::FallbackApplied { reason } => {
                warn!("moon data unavailable ({reason}); moonlight shown as Unknown")
            }
        }
    }

    let color = target.is_none() && format == Format::Text && io::stdout().is_terminal();
    colored::control::set_override(color);
    let rendered = match format {
        Format::Text => output::text(&report, color)?,
        Format::Html => output::html(&report)?,
        Format::Json => output::json(&report)?,
    };

    match target {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), "forecast written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn configure(path: Option<&Path>) -> Result<()> {
    let mut config = load_config(path)?;

    let current = config.default_location.clone().unwrap_or_default();
    let location = Text::new("Default location <latitude, longitude>:")
        .with_initial_value(&current)
        .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
            match Coordinate::parse(input) {
                Ok(_) => Ok(Validation::Valid),
                Err(err) => Ok(Validation::Invalid(err.to_string().into())),
            }
        })
        .prompt()?;
    let coordinate = Coordinate::parse(&location)?;
    config.set_default_location(coordinate);

    let contact = Text::new("Contact for the api.weather.gov User-Agent (email or URL):")
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !contact.trim().is_empty() {
        config.user_agent = Some(format!(
            "stargazer/{} ({})",
            env!("CARGO_PKG_VERSION"),
            contact.trim()
        ));
    }

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => {
            config.save()?;
            Config::config_file_path()?
        }
    };
    println!("Saved configuration to {}", saved_to.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stargazer_core::Endpoints;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

    #[test]
    fn parses_show_with_negative_offset() {
        let cli = Cli::try_parse_from([
            "stargazer",
            "show",
            "39.7, -97.1",
            "--format",
            "html",
            "--tz-offset",
            "-6",
            "--compact",
        ])
        .unwrap();

        match cli.command {
            Command::Show { coordinates, format, compact, calendar_days, tz_offset, .. } => {
                assert_eq!(coordinates.as_deref(), Some("39.7, -97.1"));
                assert_eq!(format, Format::Html);
                assert!(compact);
                assert!(!calendar_days);
                assert_eq!(tz_offset, Some(-6.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn coordinates_are_optional() {
        let cli = Cli::try_parse_from(["stargazer", "-v", "show"]).unwrap();
        assert_eq!(cli.verbose, 1);
        assert!(matches!(cli.command, Command::Show { coordinates: None, .. }));
    }

    #[tokio::test]
    async fn failed_run_leaves_output_file_empty() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("forecast.html");
        fs::write(&out, "<table>stale</table>").unwrap();

        let err = show(
            &Config::default(),
            Some("not, numbers".into()),
            Format::Html,
            Some(out.clone()),
            &RunOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Invalid format"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }

    #[tokio::test]
    async fn upstream_failure_leaves_output_file_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
            .mount(&server)
            .await;

        let config = Config {
            request_timeout_secs: 5,
            endpoints: Endpoints { nws: server.uri(), usno: server.uri() },
            ..Config::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("forecast.txt");
        fs::write(&out, "stale forecast").unwrap();

        let err = show(
            &config,
            Some("39.7456, -97.0892".into()),
            Format::Text,
            Some(out.clone()),
            &RunOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("503"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn explicit_config_path_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_location = \"47.6, -122.3\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.default_location.as_deref(), Some("47.6, -122.3"));

        let missing = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(missing, Config::default());
    }

    #[tokio::test]
    async fn missing_coordinates_without_default_is_rejected() {
        let err = show(&Config::default(), None, Format::Text, None, &RunOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Please enter coordinates"));
    }
}
