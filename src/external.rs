//! Contracts for the external collaborators this crate depends on but
//! does not implement: credential/session wiring (including multi-account assume-role
//! caching) and schema/table lifecycle. Both are out of scope for this
//! crate's implementation -- only the trait shape the Executor/Registry
//! depend on lives here: schema manager, credential plumbing, and CLI
//! tooling are external collaborators, not this crate's concern.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::Client;

use crate::error::Error;
use crate::registry::Model;

/// Supplies and refreshes credentials, invoked lazily before each request.
/// `partner_id` is `Some` for the multi-tenant case: a caller
/// assuming a role into a partner account gets back that partner's
/// `SdkConfig`, cached by the implementor with a refresh-before-expiry
/// deadline; `None` resolves the caller's own account.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn credentials(&self, partner_id: Option<&str>) -> Result<SdkConfig, Error>;
}

/// Derives a `CreateTable`-shaped request from a model's registered
/// `Metadata` (`primary_key`, `indexes`, `ttl_field` -> the
/// `TimeToLiveSpecification`) and ensures the table exists. Schema/table
/// lifecycle is a Non-goal of this crate's core; this trait exists so
/// callers have a typed seam to plug in their own implementation (or one
/// backed by infrastructure-as-code) rather than hand-rolling
/// `CreateTable` requests against `Metadata` themselves.
#[async_trait]
pub trait SchemaManager: Send + Sync {
    async fn ensure_table<T: Model + Send + Sync>(&self, client: &Client) -> Result<(), Error>;
}
