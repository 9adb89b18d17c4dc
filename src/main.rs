use anyhow::Result;
use dotenvy::dotenv;
use std::process::ExitCode;
use std::sync::Arc;

use ytrelay::cli::Cli;
use ytrelay::config::{setup_instructions, vars, Credentials, CredentialsError, Settings};
use ytrelay::conversion::ThumbnailConverter;
use ytrelay::core::{init_logger, log_cookies_configuration};
use ytrelay::download::cookies::resolve_cookie_file;
use ytrelay::download::YtDlpBackend;
use ytrelay::orchestrator::{prompt_cookie_file, prompt_url, RunOutcome, SingleOutcome};
use ytrelay::telegram::TelegramRelay;
use ytrelay::{Orchestrator, RunContext, StdinPrompter};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var(vars::LOG_FILE_PATH).ok())
        .unwrap_or_else(|| Settings::default().log_file);
    init_logger(&log_file, cli.verbose)?;
    log::info!("ytrelay {} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => {
            log::info!("Relaying to {}", credentials.channel);
            credentials
        }
        Err(e) => {
            report_credentials_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut prompter = StdinPrompter;
    let url = prompt_url(&mut prompter)?;

    let cookie_input = prompt_cookie_file(&mut prompter, settings.default_cookies.as_deref())?;
    let cookies = resolve_cookie_file(cookie_input.as_deref());
    log_cookies_configuration(cookies.as_deref());

    fs_err::create_dir_all(&settings.download_dir)?;

    let relay = TelegramRelay::new(credentials, settings.session_file.clone());
    let ctx = RunContext::new(
        settings.clone(),
        Arc::new(YtDlpBackend::new(settings.ytdl_bin.clone(), cookies)),
        Arc::new(relay),
        ThumbnailConverter::new(settings.ffmpeg_bin.clone()),
    );

    let mut orchestrator = Orchestrator::new(ctx, prompter);
    match orchestrator.run(&url).await? {
        RunOutcome::Single(SingleOutcome::Uploaded) => log::info!("Done: {}", url),
        RunOutcome::Single(SingleOutcome::Declined) => log::info!("Declined: {}", url),
        RunOutcome::Collection(summary) => log::info!("Playlist {}: {}", url, summary),
    }

    Ok(ExitCode::SUCCESS)
}

fn report_credentials_error(err: &CredentialsError) {
    log::error!("{}", err);
    match err {
        CredentialsError::Missing(names) => {
            println!("Error: Missing required environment variables:");
            for name in names {
                println!("  - {}", name);
            }
        }
        CredentialsError::InvalidApiId(_) | CredentialsError::InvalidChannel(_) => println!("Error: {}", err),
    }
    println!();
    println!("{}", setup_instructions());
}
