//! DynamORM -- a type-safe, derive-driven object mapper for Amazon
//! DynamoDB.
//!
//! A model is declared once with `#[derive(DynamormModel)]`, which expands
//! into the [`registry::Model`] and [`marshal::Marshal`] implementations
//! the rest of the crate builds on. From there: [`query::Query`] compiles
//! a fluent condition chain into a `Query` or `Scan`, [`update::UpdateBuilder`]
//! compiles an update expression, and [`executor::Executor`] is the single
//! place that actually talks to DynamoDB.
//!
//! ```ignore
//! use dynamorm::DynamormModel;
//!
//! #[derive(DynamormModel)]
//! #[dynamorm(table = "widgets")]
//! struct Widget {
//!     #[dynamorm(pk)]
//!     id: String,
//!     #[dynamorm(version)]
//!     version: i64,
//! }
//! ```

pub mod config;
pub mod cursor;
pub mod encryption;
pub mod error;
pub mod executor;
pub mod expr;
pub mod external;
pub mod index_selector;
pub mod marshal;
pub mod naming;
pub mod query;
pub mod registry;
pub mod resource_guard;
pub mod table;
pub mod update;

pub use dynamorm_derive::DynamormModel;

pub use config::{ClientConfig, TableConfig};
pub use cursor::{Cursor, CursorError, SortDirection};
pub use encryption::EncryptionProvider;
pub use error::{Error, ErrorKind};
pub use external::{CredentialsProvider, SchemaManager};
pub use executor::{
    BatchGetResult, BatchWriteResult, DynamoDbOps, Executor, LiveDynamoDb, PageResult, RetryPolicy, TransactOp,
    WriteOp,
};
pub use expr::{Condition, ConditionValue, ExpressionBuilder, FilterExpr, Joiner, Operator};
pub use index_selector::KeyCondition;
pub use marshal::{AttributeValue, Item, Marshal};
pub use naming::NamingConvention;
pub use query::{CompiledQuery, Operation, Query, Select};
pub use registry::{FieldMetadata, IndexSchema, Metadata, Model, PrimaryKeySchema, Registry};
pub use resource_guard::{ResourceGuard, ResourceGuardConfig, TokenBucketConfig};
pub use table::{batch_create, create, get, save};
pub use update::{CompiledUpdate, ReturnValues, UpdateBuilder};
