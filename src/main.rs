//! # String Analyzer CLI (`strings`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `strings init` | Create the SQLite database and run schema migrations |
//! | `strings serve` | Start the HTTP API |
//! | `strings analyze <value>` | Print the properties of a string without storing it |
//! | `strings list` | List stored strings, optionally filtered |
//!
//! ## Examples
//!
//! ```bash
//! strings init --config ./config/strings.toml
//! DATABASE_URL=sqlite:///var/lib/strings.sqlite SQL_ECHO=true strings serve
//! strings analyze "never odd or even"
//! strings list --is-palindrome true --max-length 10
//! strings list --query "strings containing the letter z"
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use string_analyzer::{commands, config, server, StringFilter};

/// String Analyzer: analyze, store, and filter strings over HTTP.
#[derive(Parser)]
#[command(name = "strings", version)]
struct Cli {
    /// Path to configuration file (TOML). Defaults apply when it does not exist.
    ///
    /// `DATABASE_URL` and `SQL_ECHO` override the `[db]` section.
    #[arg(long, global = true, default_value = "./config/strings.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema. Idempotent.
    Init,

    /// Start the HTTP server on `[server].bind`.
    Serve,

    /// Print the computed properties of a string without storing it.
    Analyze {
        value: String,
    },

    /// List stored strings.
    ///
    /// Structured filters combine with AND. `--query` instead takes one of
    /// the recognized natural-language phrases.
    List {
        #[arg(long)]
        is_palindrome: Option<bool>,

        /// Inclusive minimum length in characters.
        #[arg(long)]
        min_length: Option<usize>,

        /// Inclusive maximum length in characters.
        #[arg(long)]
        max_length: Option<usize>,

        #[arg(long)]
        word_count: Option<usize>,

        #[arg(long)]
        contains_character: Option<char>,

        /// Natural-language query, e.g. "strings longer than 10 characters".
        #[arg(long)]
        query: Option<String>,
    },
}

fn init_tracing(echo_sql: bool) {
    let default = if echo_sql {
        "info,sqlx::query=info"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Analyze { value } = &cli.command {
        return commands::run_analyze(value);
    }

    let cfg = config::load_config(&cli.config)?;
    init_tracing(cfg.db.echo_sql);

    match cli.command {
        Commands::Init => {
            commands::run_init(&cfg).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::List {
            is_palindrome,
            min_length,
            max_length,
            word_count,
            contains_character,
            query,
        } => {
            let filter = StringFilter {
                is_palindrome,
                min_length,
                max_length,
                word_count,
                contains_character,
            };
            commands::run_list(&cfg, filter, query).await?;
        }
        Commands::Analyze { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
