//! DokiAnime server: entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use dokianime::{Page, SchemaRegistry};
use dokianime_server::cli::{extract_json, schemas_summary};
use dokianime_server::config::{ConfigOverrides, ServerConfig};

#[derive(Parser)]
#[command(
    name = "dokianime",
    about = "DokiAnime: JSON API over saved anime site snapshots",
    version
)]
struct Cli {
    /// Address to bind (also reads DOKIANIME_HOST, default 0.0.0.0).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to listen on (also reads PORT, default 3000).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Directory containing the HTML snapshots (also reads DOKIANIME_DOCUMENTS).
    #[arg(long, global = true)]
    documents: Option<PathBuf>,

    /// Directory of static assets (also reads DOKIANIME_PUBLIC).
    #[arg(long, global = true)]
    public: Option<PathBuf>,

    /// Base origin prepended to scraped links (also reads DOKIANIME_ORIGIN).
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default).
    Serve,

    /// Extract one page and print it as JSON.
    Extract {
        /// Page to extract (latest, search, info, stream).
        page: Page,

        /// Print on a single line.
        #[arg(long)]
        compact: bool,
    },

    /// Print the page schemas.
    Schemas,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
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

    let overrides = ConfigOverrides {
        host: cli.host,
        port: cli.port,
        documents_dir: cli.documents,
        public_dir: cli.public,
        origin: cli.origin,
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = ServerConfig::resolve(&overrides)?;
            tracing::info!("Documents: {}", config.documents_dir.display());
            tracing::info!("Public: {}", config.public_dir.display());
            dokianime_server::server::run(config).await?;
        }

        Commands::Extract { page, compact } => {
            let config = ServerConfig::resolve(&overrides)?;
            println!("{}", extract_json(&config, page, compact)?);
        }

        Commands::Schemas => {
            let registry = SchemaRegistry::builtin()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&schemas_summary(&registry))?
            );
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dokianime", &mut std::io::stdout());
        }
    }

    Ok(())
}
