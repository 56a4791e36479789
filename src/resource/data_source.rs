//! Read-only data source
//!
//! Same inputs as the resource; every read performs the request.

use super::fetcher::{Clock, Fetched, Fetcher};
use crate::config::{ProviderConfig, ResourceConfig};
use crate::error::ResourceError;
use crate::http::RequestExecutor;

#[derive(Debug, Clone)]
pub struct RestDataSource {
    fetcher: Fetcher,
}

impl RestDataSource {
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            fetcher: Fetcher::new(provider),
        }
    }

    pub fn with_executor(mut self, executor: RequestExecutor) -> Self {
        self.fetcher = self.fetcher.with_executor(executor);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.fetcher = self.fetcher.with_clock(clock);
        self
    }

    pub async fn read(&self, cfg: &ResourceConfig) -> Result<Fetched, ResourceError> {
        self.fetcher.fetch(cfg).await
    }
}
