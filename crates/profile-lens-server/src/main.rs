//! ProfileLens: entry point.

use std::io::Read;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use profile_lens::{LookupResponse, Platform};
use profile_lens_server::config::{resolve_addr, LensConfig};
use profile_lens_server::render::summary_lines;
use profile_lens_server::{rest, ProfileLens};

#[derive(Parser)]
#[command(
    name = "profile-lens",
    about = "Extract numeric IDs, names and photos from Facebook and Instagram profile pages",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Custom rules file (JSON, same schema as the built-in tables).
    #[arg(long, global = true)]
    rules: Option<String>,

    /// User-Agent sent with profile requests.
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Request timeout in milliseconds. Unset means no timeout.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and web page.
    Serve {
        /// Listen address (host:port).
        /// Also reads from PROFILE_LENS_ADDR env var.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Look up one profile URL or handle.
    Extract {
        /// Profile URL, or a bare handle together with --platform.
        input: String,

        /// Platform for a bare handle (facebook, instagram).
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Print the JSON response instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Extract from page source saved from a browser.
    Manual {
        /// URL the page source was saved from.
        #[arg(long)]
        url: String,

        /// File holding the page source. Reads stdin when omitted.
        #[arg(long)]
        html_file: Option<String>,

        /// Print the JSON response instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print the active extraction rules as JSON.
    Rules,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   profile-lens completions bash > ~/.local/share/bash-completion/completions/profile-lens
    ///   profile-lens completions zsh > ~/.zfunc/_profile-lens
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = LensConfig::resolve(
        cli.user_agent.as_deref(),
        cli.timeout_ms,
        cli.rules.as_deref(),
    );

    match cli.command {
        Commands::Serve { addr } => {
            let addr = resolve_addr(addr.as_deref());
            let lens = ProfileLens::from_config(&config)?;
            match &config.rules_path {
                Some(path) => tracing::info!("Rules: {}", path.display()),
                None => tracing::info!("Rules: built-in"),
            }
            rest::start(&addr, Arc::new(lens)).await?;
        }

        Commands::Extract {
            input,
            platform,
            json,
        } => {
            let lens = ProfileLens::from_config(&config)?;
            if platform.is_none() && !profile_lens::looks_like_url(input.trim()) {
                eprintln!("'{input}' is not a URL; pass --platform facebook or --platform instagram");
                std::process::exit(2);
            }
            let resp = lens.respond(Some(&input), platform).await;
            finish(&resp, json)?;
        }

        Commands::Manual {
            url,
            html_file,
            json,
        } => {
            let html = match html_file {
                Some(path) => std::fs::read_to_string(&path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let lens = ProfileLens::from_config(&config)?;
            let resp = lens.respond_manual(&html, &url);
            finish(&resp, json)?;
        }

        Commands::Rules => {
            let rules = config.load_rules()?;
            println!("{}", serde_json::to_string_pretty(rules.spec())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "profile-lens", &mut std::io::stdout());
        }

        Commands::Repl => {
            let lens = ProfileLens::from_config(&config)?;
            profile_lens_server::repl::run(lens).await?;
        }
    }

    Ok(())
}

/// Print a lookup result and exit non-zero when it failed.
fn finish(resp: &LookupResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resp)?);
    } else {
        for line in summary_lines(resp) {
            println!("{line}");
        }
    }
    if !resp.success {
        std::process::exit(1);
    }
    Ok(())
}
