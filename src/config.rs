//! Configuration (C13): the ambient engineering layer around client
//! construction -- an endpoint/region/timeout/retry/resource-guard bundle
//! assembled once per cold start and reused across warm invocations,
//! rather than re-resolving `aws_config::from_env()` on every call.

use std::time::Duration;

use aws_sdk_dynamodb::Client;

use crate::executor::{Executor, LiveDynamoDb, RetryPolicy};
use crate::naming::NamingConvention;
use crate::resource_guard::{ResourceGuard, ResourceGuardConfig};

/// Assembles the process-wide `aws_sdk_dynamodb::Client` plus the
/// retry/resource-guard policy every [`Executor`] is built from. Meant to
/// be constructed once per cold start and reused across warm serverless
/// invocations -- the client is process-wide, not rebuilt per call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Overrides the SDK's own endpoint resolution -- e.g. a local
    /// DynamoDB Local instance for tests.
    pub endpoint_url: Option<String>,
    /// Overrides the region the SDK would otherwise resolve from the
    /// environment/profile chain.
    pub region: Option<String>,
    /// Upper bound on how long a single DynamoDB API call may take before
    /// the SDK's own retryer gives up, independent of the caller's
    /// serverless-deadline budget.
    pub operation_timeout: Duration,
    /// Default naming convention applied to models that don't declare
    /// their own via `#[dynamorm(naming = "...")]`.
    pub default_naming_convention: NamingConvention,
    pub retry: RetryPolicy,
    pub resource_guard: ResourceGuardConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: None,
            operation_timeout: Duration::from_secs(10),
            default_naming_convention: NamingConvention::CamelCase,
            retry: RetryPolicy::default(),
            resource_guard: ResourceGuardConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn naming_convention(mut self, convention: NamingConvention) -> Self {
        self.default_naming_convention = convention;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn resource_guard(mut self, guard: ResourceGuardConfig) -> Self {
        self.resource_guard = guard;
        self
    }

    /// Loads credentials/region from the environment via
    /// `aws_config::from_env()`, applies any overrides set on this
    /// config, and builds the long-lived
    /// `Executor` application code should hold for the life of the
    /// process.
    pub async fn build(&self) -> Executor<LiveDynamoDb> {
        let client = self.build_client().await;
        Executor::with_ops(
            LiveDynamoDb { client },
            self.retry,
            ResourceGuard::new(self.resource_guard),
        )
    }

    /// Builds the bare `aws_sdk_dynamodb::Client`, for callers that want
    /// to manage the `Executor` construction themselves (e.g. to attach
    /// an [`crate::encryption::EncryptionProvider`]).
    pub async fn build_client(&self) -> Client {
        let mut loader = aws_config::from_env();
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        if let Some(region) = &self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;
        Client::new(&sdk_config)
    }
}

/// Per-table overrides layered on top of a [`ClientConfig`]: the table
/// name to use in place of a model's derived default, and whether reads
/// against it should be strongly consistent by default.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub table_name: Option<String>,
    pub consistent_read: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { table_name: None, consistent_read: true }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn consistent_read(mut self, consistent: bool) -> Self {
        self.consistent_read = consistent;
        self
    }

    /// Resolves the effective table name: this override if set, otherwise
    /// the model's own derived/declared name.
    pub fn resolve_table_name<'a>(&'a self, model_default: &'a str) -> &'a str {
        self.table_name.as_deref().unwrap_or(model_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_naming_convention_is_camel_case() {
        assert_eq!(ClientConfig::default().default_naming_convention, NamingConvention::CamelCase);
    }

    #[test]
    fn table_config_falls_back_to_model_default() {
        let config = TableConfig::new();
        assert_eq!(config.resolve_table_name("widgets"), "widgets");
        let config = TableConfig::new().table_name("widgets-v2");
        assert_eq!(config.resolve_table_name("widgets"), "widgets-v2");
    }
}
