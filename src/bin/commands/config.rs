use rdskit::utils::OutputFormat;
use rdskit::RdsConfig;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    database_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_size_bytes: Option<u64>,
    #[serde(flatten)]
    settings: &'a RdsConfig,
}

pub fn run(config: &RdsConfig, config_path: Option<&str>, output_format: OutputFormat) {
    let exists = Path::new(&config.database).exists();
    let info = ConfigInfo {
        config_file: config_path
            .map(str::to_string)
            .unwrap_or_else(RdsConfig::config_file_path),
        database_exists: exists,
        database_size_bytes: if exists {
            std::fs::metadata(&config.database).ok().map(|m| m.len())
        } else {
            None
        },
        settings: config,
    };

    if output_format.is_json() {
        let json = if output_format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(&info)
        } else {
            serde_json::to_string(&info)
        };
        match json {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        }
        return;
    }

    println!("Config File:        {}", info.config_file);
    println!("{}", config.summary());
    match info.database_size_bytes {
        Some(size) => println!("Database Size:      {} bytes", size),
        None => println!("Database Size:      (not created yet)"),
    }
}
