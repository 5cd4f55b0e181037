use rdskit::utils::OutputFormat;
use rdskit::RdsConfig;
use serde::Serialize;
use std::collections::BTreeMap;

use super::open_db;

#[derive(Debug, Serialize)]
struct PingStatus {
    database: String,
    reachable: bool,
    schema: String,
    rows: BTreeMap<String, u64>,
    connections: u32,
    idle: u32,
    max_open: u32,
}

pub fn run_init(config: &RdsConfig) {
    let db = open_db(config);
    match db.init_schema() {
        Ok(()) => println!("Initialized controls and runtime tables in {}", config.database),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_reset(config: &RdsConfig, yes: bool) {
    if !yes {
        eprintln!("ERROR: reset drops the controls and runtime tables, pass --yes to confirm");
        std::process::exit(1);
    }
    let db = open_db(config);
    match db.reset_schema() {
        Ok(()) => println!("Dropped controls and runtime tables in {}", config.database),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn run_ping(config: &RdsConfig, output_format: OutputFormat) {
    let db = open_db(config);
    let reachable = db.ping();
    let schema = match db.schema_status() {
        Ok(status) => status.to_string(),
        Err(e) => format!("unknown ({})", e),
    };
    let rows = match db.lookup_table_counts() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            BTreeMap::new()
        }
    };
    let pool = db.pool_status();

    let status = PingStatus {
        database: config.database.clone(),
        reachable,
        schema,
        rows,
        connections: pool.connections,
        idle: pool.idle,
        max_open: db.settings().max_open,
    };

    if output_format.is_json() {
        let json = if output_format == OutputFormat::JsonPretty {
            serde_json::to_string_pretty(&status)
        } else {
            serde_json::to_string(&status)
        };
        match json {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        }
    } else {
        println!("Database:     {}", status.database);
        println!("Reachable:    {}", status.reachable);
        println!("Schema:       {}", status.schema);
        for (table, count) in &status.rows {
            println!("Rows:         {} {}", table, count);
        }
        println!(
            "Connections:  {} open, {} idle, {} max",
            status.connections, status.idle, status.max_open
        );
    }

    if !reachable {
        std::process::exit(1);
    }
}
