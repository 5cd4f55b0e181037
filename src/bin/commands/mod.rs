use rdskit::database::{ensure_parent_dir, RdsDb, RowRecord};
use rdskit::utils::{format_records, OutputFormat};
use rdskit::RdsConfig;
use std::collections::BTreeMap;

pub mod config;
pub mod control;
pub mod database;
pub mod query;
pub mod runtime;

/// Open the configured database or exit
pub(crate) fn open_db(config: &RdsConfig) -> RdsDb {
    let result = ensure_parent_dir(&config.database).and_then(|_| RdsDb::from_config(config));
    match result {
        Ok(db) => db,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a single scalar
pub(crate) fn print_value<T: serde::Serialize + std::fmt::Display>(
    value: &T,
    output_format: OutputFormat,
) {
    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        _ => println!("{}", value),
    }
}

/// Print a list of strings, one per line or as a JSON array
pub(crate) fn print_list(values: &[String], output_format: OutputFormat) {
    match output_format {
        OutputFormat::Json => match serde_json::to_string(values) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(values) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonLine => {
            for v in values {
                match serde_json::to_string(v) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
                }
            }
        }
        _ => {
            for v in values {
                println!("{}", v);
            }
        }
    }
}

/// Print key/value pairs as a JSON object, or as name/value records otherwise
pub(crate) fn print_pairs(pairs: &BTreeMap<String, String>, output_format: OutputFormat) {
    match output_format {
        OutputFormat::Json => match serde_json::to_string(pairs) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(pairs) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        _ => {
            let records: Vec<RowRecord> = pairs
                .iter()
                .map(|(k, v)| [("name", k.as_str()), ("value", v.as_str())].into_iter().collect())
                .collect();
            println!("{}", format_records(&records, output_format));
        }
    }
}
