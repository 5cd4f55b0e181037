use clap::{Args, Subcommand};
use rdskit::utils::OutputFormat;
use rdskit::RdsConfig;

use super::{open_db, print_value};

/// Arguments for the Runtime command
#[derive(Args)]
pub struct RuntimeArgs {
    #[clap(subcommand)]
    pub command: RuntimeCommands,
}

/// Runtime subcommands
#[derive(Subcommand)]
pub enum RuntimeCommands {
    /// Print a runtime value (empty if unset)
    Get {
        /// Runtime value name
        name: String,
    },

    /// Update an existing runtime value
    Set {
        /// Runtime value name
        name: String,

        /// New value
        value: String,
    },
}

pub fn run(config: &RdsConfig, args: RuntimeArgs, output_format: OutputFormat) {
    let db = open_db(config);
    let runtime = db.runtime();

    match args.command {
        RuntimeCommands::Get { name } => print_value(&runtime.get(&name), output_format),
        RuntimeCommands::Set { name, value } => {
            if let Err(e) = runtime.set(&name, &value) {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        }
    }
}
