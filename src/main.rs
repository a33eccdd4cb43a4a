mod api;
mod core;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "dossier", about = "Terminal client for a document Q&A backend")]
struct Args {
    /// Backend base URL (overrides config file and DOSSIER_BACKEND_URL)
    #[arg(short, long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to dossier.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("dossier.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match core::config::load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Config error: {e}, falling back to defaults");
            core::config::DossierConfig::default()
        }
    };
    let resolved = core::config::resolve(&config, args.backend.as_deref());

    log::info!("Dossier starting up against {}", resolved.base_url);

    tui::run(resolved)
}
