//! Service context bundling all port trait objects.

use crate::adapters::live::{LiveClock, LiveFileSystem, LiveWorkOrderApi};
use crate::config::MigrationConfig;
use crate::error::ConfigError;
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;
use crate::ports::work_orders::WorkOrderApi;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live, or fakes in tests).
pub struct ServiceContext {
    /// Filesystem holding the input, processed and error directories.
    pub fs: Box<dyn FileSystem>,
    /// Clock for obtaining the current time.
    pub clock: Box<dyn Clock>,
    /// Downstream work-order API.
    pub api: Box<dyn WorkOrderApi>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, clock: Box<dyn Clock>, api: Box<dyn WorkOrderApi>) -> Self {
        Self { fs, clock, api }
    }

    /// Creates a live context: real disk, system clock and the HTTP API
    /// described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &MigrationConfig) -> Result<Self, ConfigError> {
        let api = LiveWorkOrderApi::new(
            &config.api_base_url,
            config.api_key.as_str(),
            config.request_timeout,
        )?;
        Ok(Self::new(Box::new(LiveFileSystem), Box::new(LiveClock), Box::new(api)))
    }
}
