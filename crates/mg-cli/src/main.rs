use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod client;
mod commands;

use commands::expedition::WindowOpts;

#[derive(Parser)]
#[command(name = "mg")]
#[command(about = "MultiGest expedition CLI", long_about = None)]
struct Cli {
    /// Config layers in merge order (default: config/defaults/{base,cli}.yaml if present)
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        cmd: DbCmd,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> surface -> overlays)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Query the daemon for scheduled deliveries
    Expedition {
        #[command(subcommand)]
        cmd: ExpeditionCmd,
    },
}

#[derive(Subcommand)]
enum DbCmd {
    /// Connectivity, schema presence and undelivered item count
    Status,

    /// Apply SQL migrations
    Migrate,

    /// Load contracts and items from a JSON seed fixture
    Seed {
        #[arg(long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum ExpeditionCmd {
    /// One line per scheduled item with its verdict
    List(WindowArgs),

    /// Released / blocked counters for the window
    Summary(WindowArgs),
}

#[derive(Args)]
struct WindowArgs {
    /// First day (YYYY-MM-DD); default: today in --tz
    #[arg(long)]
    start: Option<String>,

    /// Last day, inclusive (YYYY-MM-DD); default: start + --days
    #[arg(long)]
    end: Option<String>,

    /// Daemon base URL (default: cli.daemon_url)
    #[arg(long)]
    daemon: Option<String>,

    /// Window length when --end is omitted (default: expedition.default_window_days)
    #[arg(long)]
    days: Option<u32>,

    /// IANA time zone that defines "today" (default: expedition.timezone)
    #[arg(long)]
    tz: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = mg_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Db { cmd } => {
            let (cfg, _) = commands::load_cli_config(&cli.config_paths)?;
            init_tracing(&cfg.logging.filter);
            match cmd {
                DbCmd::Status => commands::db::db_status(&cfg).await?,
                DbCmd::Migrate => commands::db::db_migrate(&cfg).await?,
                DbCmd::Seed { file } => commands::db::db_seed(&cfg, &file).await?,
            }
        }

        Commands::Expedition { cmd } => {
            let (cfg, _) = commands::load_cli_config(&cli.config_paths)?;
            init_tracing(&cfg.logging.filter);

            let (args, list) = match cmd {
                ExpeditionCmd::List(args) => (args, true),
                ExpeditionCmd::Summary(args) => (args, false),
            };
            let daemon_url = args.daemon.unwrap_or_else(|| cfg.cli.daemon_url.clone());
            let opts = WindowOpts::from_args(&cfg, args.start, args.end, args.days, args.tz);

            if list {
                commands::expedition::expedition_list(&daemon_url, &opts).await?;
            } else {
                commands::expedition::expedition_summary(&daemon_url, &opts).await?;
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(config_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config_filter.into()),
        )
        .init();
}
