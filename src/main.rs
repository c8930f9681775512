use clap::Parser;
use std::sync::Arc;
use tokio::sync::Notify;

use dirlist::config::{self, AppState, ListingFormat, Overrides};
use dirlist::{logger, server};

#[derive(Parser, Debug)]
#[command(name = "dirlist")]
#[command(about = "Serve a directory over HTTP, answering directory requests with JSON listings")]
#[command(version)]
struct Cli {
    /// Port to serve on [default: 8100]
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// The directory of static files to host [default: .]
    #[arg(short = 'd', long = "dir")]
    directory: Option<String>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// Listing shape: detailed, names or split [default: detailed]
    #[arg(short = 'f', long)]
    format: Option<ListingFormat>,

    /// Config file path, without extension
    #[arg(short = 'c', long = "config", env = "DIRLIST_CONFIG", default_value = "dirlist")]
    config_path: String,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            root: self.directory.clone(),
            format: self.format,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config_path, &cli.overrides())?;

    logger::init(&cfg)?;

    // Worker count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = AppState::new(&cfg)
        .map_err(|e| format!("cannot serve '{}': {e}", cfg.listing.root))?;
    let state = Arc::new(state);

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, state.responder.root(), &cfg);

    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    server::start_server_loop(listener, state, shutdown).await?;
    Ok(())
}
