#![allow(unused_imports)]

// Derive macro
use dynamorm::DynamormModel;

// Core traits and registry surface
use dynamorm::{Marshal, Model, Registry};

// Query/update builders
use dynamorm::{Query, UpdateBuilder};

// Executor and its transport seam
use dynamorm::{DynamoDbOps, Executor, LiveDynamoDb};

// Errors
use dynamorm::{Error, ErrorKind};

// Pagination
use dynamorm::{Cursor, SortDirection};

// Encryption
use dynamorm::EncryptionProvider;

// Table-level free functions
use dynamorm::{batch_create, create, get, save};

fn main() {}
