use clap::Parser;

/// Everything else is asked interactively.
#[derive(Parser, Debug)]
#[command(name = "ytrelay")]
#[command(author, version, about = "Download YouTube videos and relay them to a Telegram channel", long_about = None)]
pub struct Cli {
    /// Log file path (overrides LOG_FILE_PATH)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<String>,

    /// Info on the terminal, debug in the log file
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
