use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use scenegen_client::GenerationClient;
use scenegen_core::request::{HashtagSource, SubmissionRequest};
use scenegen_core::ScenegenConfig;

/// scenegen: generate social content scenarios from keywords and hashtags.
///
/// Sends your keywords and hashtags to a scenario generation service and
/// shows the returned scenarios, their content guidance, and the hashtags
/// trending across them.
#[derive(Parser, Debug)]
#[command(name = "scenegen", version, about)]
struct Cli {
    /// Keywords describing the content (can also be set in the TUI).
    #[arg(short, long)]
    keyword: Option<String>,

    /// Hashtags as free text, e.g. "#travel #summer". Only #words are used.
    #[arg(long)]
    hashtags: Option<String>,

    /// Base URL of the generation service (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a config file (defaults to the user config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Submit once and print the response as JSON instead of starting the TUI.
    #[arg(long, requires = "keyword")]
    print: bool,

    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = match cli.config {
        Some(ref path) => ScenegenConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ScenegenConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            ScenegenConfig::default()
        }),
    };
    if let Some(ref base_url) = cli.base_url {
        config.service.base_url = base_url.clone();
    }

    tracing::info!(
        url = %config.service.base_url,
        "Starting scenegen v{}",
        env!("CARGO_PKG_VERSION")
    );

    if cli.print {
        let keyword = cli.keyword.unwrap_or_default();
        let hashtags = cli.hashtags.unwrap_or_default();
        if let Err(e) = print_once(&config, keyword, hashtags).await {
            tracing::error!("One-shot generation failed: {}", e);
            eprintln!("{e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    // Start the TUI.
    let mut app = scenegen_tui::App::new(&config);

    if let Some(keyword) = cli.keyword {
        app.set_initial_keyword(keyword);
    }
    if let Some(hashtags) = cli.hashtags {
        app.set_initial_hashtags(hashtags);
    }

    app.run().await?;

    tracing::info!("scenegen exited cleanly");
    Ok(())
}

/// One submission, printed as pretty JSON on stdout.
async fn print_once(config: &ScenegenConfig, keyword: String, hashtags: String) -> Result<()> {
    let request = SubmissionRequest::new(keyword, HashtagSource::FreeText(hashtags))?;
    let client = GenerationClient::new(config.service.base_url.clone(), config.timeout());

    let response = client.generate(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Log to a file to avoid corrupting the TUI output. If the log file
    // can't be opened, discard logs rather than write to the alternate screen.
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scenegen");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("scenegen.log"));

    match log_file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
                )
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new("off"))
                .with_writer(std::io::sink)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn print_requires_keyword() {
        assert!(Cli::try_parse_from(["scenegen", "--print"]).is_err());
        let cli = Cli::try_parse_from(["scenegen", "--print", "-k", "tote", "-vv"]).unwrap();
        assert!(cli.print);
        assert_eq!(cli.keyword.as_deref(), Some("tote"));
        assert_eq!(cli.verbose, 2);
    }
}
