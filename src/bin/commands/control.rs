use clap::{Args, Subcommand};
use rdskit::utils::OutputFormat;
use rdskit::RdsConfig;

use super::{open_db, print_pairs, print_value};

/// Arguments for the Control command
#[derive(Args)]
pub struct ControlArgs {
    #[clap(subcommand)]
    pub command: ControlCommands,
}

/// Control subcommands
#[derive(Subcommand)]
pub enum ControlCommands {
    /// Print a single control value for this host
    Get {
        /// Control zone
        zone: String,

        /// Control name
        name: String,

        /// Value printed when the control is not set
        #[clap(long, default_value = "")]
        default: String,
    },

    /// List all controls of a zone for this host
    List {
        /// Control zone
        zone: String,
    },
}

pub fn run(config: &RdsConfig, args: ControlArgs, output_format: OutputFormat) {
    let db = open_db(config);
    let controls = db.controls();

    match args.command {
        ControlCommands::Get {
            zone,
            name,
            default,
        } => print_value(&controls.get(&zone, &name, &default), output_format),
        ControlCommands::List { zone } => match controls.get_zone(&zone) {
            Some(values) => print_pairs(&values, output_format),
            None => {
                eprintln!(
                    "ERROR: failed to list controls of zone '{}' for host '{}'",
                    zone,
                    controls.host()
                );
                std::process::exit(1);
            }
        },
    }
}
