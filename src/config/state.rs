// Application state module
// Shared, read-only state handed to every connection task

use super::types::Config;
use crate::handler::DirListing;
use std::io;

/// State shared by all connections.
///
/// Nothing in here is mutated after startup; requests never share
/// mutable data.
pub struct AppState {
    pub config: Config,
    pub responder: DirListing,
}

impl AppState {
    /// Build the state, failing if the served root cannot be resolved
    pub fn new(config: &Config) -> io::Result<Self> {
        Ok(Self {
            config: config.clone(),
            responder: DirListing::new(&config.listing)?,
        })
    }
}
