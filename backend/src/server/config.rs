//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use symptom_tracker::domain::ports::{DisabledSummariser, SymptomSummariser, TokenVerifier};
use symptom_tracker::middleware::RateLimitConfig;
use symptom_tracker::outbound::cognito::CognitoIdentityProvider;
use symptom_tracker::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) identity: CognitoIdentityProvider,
    pub(crate) verifier: Arc<dyn TokenVerifier>,
    pub(crate) summariser: Arc<dyn SymptomSummariser>,
    pub(crate) rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Insights stay disabled and the rate limit uses its defaults until
    /// overridden.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        identity: CognitoIdentityProvider,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            identity,
            verifier,
            summariser: Arc::new(DisabledSummariser),
            rate_limit: RateLimitConfig::default(),
        }
    }

    #[must_use]
    pub fn with_summariser(mut self, summariser: Arc<dyn SymptomSummariser>) -> Self {
        self.summariser = summariser;
        self
    }

    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }
}
