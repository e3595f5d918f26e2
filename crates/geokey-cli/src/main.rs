//! geokey — command-line interface for geokey-core
//!
//! Usage examples
//! --------------
//! - Show stats: `geokey -i geo.csv stats`
//! - One-off query: `geokey -i geo.csv search "київ"`
//! - Interactive loop: `geokey -i geo.csv repl`
//! - Re-export: `geokey -i geo.csv export tree out.csv`
//! - HTTP API: `geokey -i geo.csv serve --addr 127.0.0.1:8080`

mod args;
mod server;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use geokey_core::prelude::*;

use crate::args::{CliArgs, Commands, ExportMode};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();

    let start = std::time::Instant::now();
    let engine = Engine::load_path(&args.input)?;
    tracing::info!(path = %args.input.display(), elapsed = ?start.elapsed(), "database ready");

    match args.command {
        Commands::Stats => {
            let stats = engine.stats();
            println!("Records: {}", stats.records);
            println!("Synthesized parents: {}", stats.synthesized);
            println!("{}", serde_json::to_string_pretty(&stats.trie)?);
        }

        Commands::Search { query, limit } => {
            let response = match limit {
                Some(limit) => engine.search_with_limit(&query, limit),
                None => engine.search(&query),
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Repl => repl(&engine)?,

        Commands::Export { mode, output } => {
            let flavor = match mode {
                ExportMode::Denorm => CsvFlavor::Denormalized,
                ExportMode::Tree => CsvFlavor::Tree,
            };
            engine.export_csv(&output, flavor)?;
            println!("Exported {} records to {}", engine.registry().len(), output.display());
        }

        Commands::Serve { addr } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(Arc::new(engine), addr))?;
        }
    }

    Ok(())
}

fn repl(engine: &Engine) -> anyhow::Result<()> {
    println!("Enter query (empty to exit):");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let response = engine.search(query);
        if response.query != query {
            println!("Did you mean _{}_?", response.query);
        }
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    println!("Bye!");
    Ok(())
}
