use clap::{Parser, Subcommand};
use rdskit::utils::OutputFormat;
use rdskit::RdsConfig;
use tracing::Level;

mod commands;

use commands::control::ControlArgs;
use commands::query::{ExecArgs, QueryArgs, ValueArgs};
use commands::runtime::RuntimeArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.rdskit/rdskit.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// SQLite database file, overrides the configured one
    #[clap(short, long, global = true)]
    database: Option<String>,

    /// Use a single connection instead of a pool
    #[clap(long, global = true)]
    single_conn: bool,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print every row as a record
    Query(QueryArgs),

    /// Print the first column of the first row
    Value(ValueArgs),

    /// Print the first column of every row
    Column(ExecArgs),

    /// Print the first two columns of every row as key/value pairs
    Pairs(ExecArgs),

    /// Execute a statement and print the number of changed rows
    Exec(ExecArgs),

    /// Look up per-host control values
    Control(ControlArgs),

    /// Read or update runtime values
    Runtime(RuntimeArgs),

    /// Create the controls and runtime tables
    Init,

    /// Drop the controls and runtime tables
    Reset {
        /// Confirm dropping the tables
        #[clap(long)]
        yes: bool,
    },

    /// Check that the database answers
    Ping,

    /// Escape a string for use inside a quoted SQL literal
    Escape {
        /// Text to escape
        text: String,
    },

    /// Show the effective configuration
    Config,
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // filter spans/events with level DEBUG or higher.
            .with_max_level(Level::DEBUG)
            .init();
    }

    let mut config = match RdsConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(database) = cli.database {
        config.database = database;
    }
    if cli.single_conn {
        config.single_conn = true;
    }

    let output_format = cli.format;

    match cli.command {
        Commands::Query(args) => commands::query::run_query(&config, args, output_format),
        Commands::Value(args) => commands::query::run_value(&config, args, output_format),
        Commands::Column(args) => commands::query::run_column(&config, args, output_format),
        Commands::Pairs(args) => commands::query::run_pairs(&config, args, output_format),
        Commands::Exec(args) => commands::query::run_exec(&config, args, output_format),
        Commands::Control(args) => commands::control::run(&config, args, output_format),
        Commands::Runtime(args) => commands::runtime::run(&config, args, output_format),
        Commands::Init => commands::database::run_init(&config),
        Commands::Reset { yes } => commands::database::run_reset(&config, yes),
        Commands::Ping => commands::database::run_ping(&config, output_format),
        Commands::Escape { text } => println!("{}", rdskit::escape(&text)),
        Commands::Config => commands::config::run(&config, cli.config.as_deref(), output_format),
    }
}
