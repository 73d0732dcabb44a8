//! Builder for configuring client instances

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::Client;
use crate::config::ClientConfig;
use crate::providers::retry::RetryConfig;
use crate::providers::traits::{Embedder, Generator, Reranker};

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for configuring client instances.
///
/// The primary generator is mandatory and taken up front; everything else is
/// optional. Configuration is fixed once [`build`](Self::build) returns.
pub struct ClientBuilder {
    generator: Arc<dyn Generator>,
    embedder: Option<Arc<dyn Embedder>>,
    reranker: Option<Arc<dyn Reranker>>,
    fallback_generators: Vec<Arc<dyn Generator>>,
    fallback_embedders: Vec<Arc<dyn Embedder>>,
    fallback_rerankers: Vec<Arc<dyn Reranker>>,
    retry: RetryConfig,
    timeout: Duration,
    debug: bool,
}

impl ClientBuilder {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            embedder: None,
            reranker: None,
            fallback_generators: Vec::new(),
            fallback_embedders: Vec::new(),
            fallback_rerankers: Vec::new(),
            retry: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }

    /// Bind an embedder, overriding one detected on the primary generator.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Bind a reranker, overriding one detected on the primary generator.
    pub fn reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Set the number of attempts per provider on transient errors (default: 3).
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry.max_attempts = count;
        self
    }

    /// Set the backoff delays used between retries.
    pub fn retry_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.retry.initial_delay = initial;
        self.retry.max_delay = max;
        self
    }

    /// Replace the whole retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Set the ordered generator fallback list.
    pub fn fallback_generators(
        mut self,
        generators: impl IntoIterator<Item = Arc<dyn Generator>>,
    ) -> Self {
        self.fallback_generators = generators.into_iter().collect();
        self
    }

    /// Append one generator to the end of the fallback list.
    pub fn fallback_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.fallback_generators.push(generator);
        self
    }

    /// Set the ordered embedder fallback list.
    pub fn fallback_embedders(
        mut self,
        embedders: impl IntoIterator<Item = Arc<dyn Embedder>>,
    ) -> Self {
        self.fallback_embedders = embedders.into_iter().collect();
        self
    }

    /// Append one embedder to the end of the fallback list.
    pub fn fallback_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.fallback_embedders.push(embedder);
        self
    }

    /// Set the ordered reranker fallback list.
    pub fn fallback_rerankers(
        mut self,
        rerankers: impl IntoIterator<Item = Arc<dyn Reranker>>,
    ) -> Self {
        self.fallback_rerankers = rerankers.into_iter().collect();
        self
    }

    /// Append one reranker to the end of the fallback list.
    pub fn fallback_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.fallback_rerankers.push(reranker);
        self
    }

    /// Set the deadline applied to every provider call (default: 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Toggle verbose request logging.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Apply timeout, retry and debug settings from a loaded configuration.
    pub fn config(self, config: &ClientConfig) -> Self {
        self.timeout(config.timeout())
            .retry_config(config.retry_config())
            .debug(config.debug)
    }

    /// Build the client.
    ///
    /// Unless overridden, the primary generator is also bound as embedder
    /// and/or reranker when it advertises those capabilities.
    pub fn build(self) -> Client {
        let embedder = self
            .embedder
            .or_else(|| Arc::clone(&self.generator).as_embedder());
        let reranker = self
            .reranker
            .or_else(|| Arc::clone(&self.generator).as_reranker());

        debug!(
            generator = self.generator.name(),
            embedder = embedder.as_ref().map(|e| e.name()),
            reranker = reranker.as_ref().map(|r| r.name()),
            fallback_generators = self.fallback_generators.len(),
            fallback_embedders = self.fallback_embedders.len(),
            fallback_rerankers = self.fallback_rerankers.len(),
            "client built"
        );

        Client {
            generator: self.generator,
            embedder,
            reranker,
            fallback_generators: self.fallback_generators,
            fallback_embedders: self.fallback_embedders,
            fallback_rerankers: self.fallback_rerankers,
            retry: self.retry,
            timeout: self.timeout,
            debug: self.debug,
        }
    }
}
