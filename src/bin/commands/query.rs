use clap::Args;
use rdskit::utils::{format_records, OutputFormat};
use rdskit::RdsConfig;

use super::{open_db, print_list, print_pairs, print_value};

/// Arguments for the Query command
#[derive(Args)]
pub struct QueryArgs {
    /// SQL query to run
    #[clap(value_name = "SQL")]
    pub sql: String,

    /// Only decode the first row
    #[clap(long)]
    pub first: bool,
}

/// Arguments for the Value command
#[derive(Args)]
pub struct ValueArgs {
    /// SQL query returning a single column
    #[clap(value_name = "SQL")]
    pub sql: String,

    /// Value printed when the query returns nothing or fails
    #[clap(long, default_value = "")]
    pub default: String,

    /// Read the value as an integer
    #[clap(long)]
    pub int: bool,
}

/// Arguments for commands taking only a SQL statement
#[derive(Args)]
pub struct ExecArgs {
    /// SQL statement
    #[clap(value_name = "SQL")]
    pub sql: String,
}

pub fn run_query(config: &RdsConfig, args: QueryArgs, output_format: OutputFormat) {
    let QueryArgs { sql, first } = args;
    let db = open_db(config);

    let result = if first {
        db.query_record(&sql, []).map(|r| r.into_iter().collect::<Vec<_>>())
    } else {
        db.query_records(&sql, [])
    };

    match result {
        Ok(records) if records.is_empty() && !output_format.is_json() => {
            eprintln!("no rows");
        }
        Ok(records) => println!("{}", format_records(&records, output_format)),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_value(config: &RdsConfig, args: ValueArgs, output_format: OutputFormat) {
    let ValueArgs { sql, default, int } = args;

    if int {
        let otherwise = match int_default(&default) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
        };
        let db = open_db(config);
        print_value(&db.query_int(otherwise, &sql, []), output_format);
    } else {
        let db = open_db(config);
        print_value(&db.query_string(&default, &sql, []), output_format);
    }
}

/// Fallback for `value --int`; an empty `--default` means 0
fn int_default(default: &str) -> Result<i64, String> {
    match default.trim() {
        "" => Ok(0),
        s => s
            .parse()
            .map_err(|e| format!("--default must be an integer with --int: {}", e)),
    }
}

pub fn run_column(config: &RdsConfig, args: ExecArgs, output_format: OutputFormat) {
    let db = open_db(config);
    match db.query_column(&args.sql, []) {
        Ok(values) => print_list(&values, output_format),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_pairs(config: &RdsConfig, args: ExecArgs, output_format: OutputFormat) {
    let db = open_db(config);
    match db.query_pairs(&args.sql, []) {
        Ok(pairs) => print_pairs(&pairs, output_format),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_exec(config: &RdsConfig, args: ExecArgs, output_format: OutputFormat) {
    let db = open_db(config);
    match db.exec(&args.sql, []) {
        Ok(changed) => print_value(&changed, output_format),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
