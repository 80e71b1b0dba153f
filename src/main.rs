use clap::Parser;

use ragline::cli::{Cli, Commands, commands};
use ragline::{Settings, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_with_config(&settings.logging);

    let result = match cli.command {
        Commands::Init { force } => commands::init::run_init(force),
        Commands::Index {
            doc_root,
            no_progress,
        } => commands::index::run(&settings, &doc_root, no_progress).await,
        Commands::Search { query, limit, json } => {
            commands::search::run(&settings, &query, limit, json).await
        }
        Commands::Ask { question, top_k } => {
            commands::ask::run(&settings, &question, top_k).await
        }
        Commands::Stats { log_file, json } => commands::stats::run(&log_file, json),
        Commands::Config => commands::init::run_config(&settings),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
