//! Derive macros for [`dynamorm`](https://docs.rs/dynamorm).
//!
//! This crate expands `#[derive(DynamormModel)]` into the `Model` and
//! `Marshal` trait implementations the runtime crate consumes. Rust has no
//! struct-tag reflection, so the `dynamorm` annotation grammar described by
//! the mapper's documentation is parsed here, at compile time, instead of
//! at first-use like a reflection-based mapper would.

mod attrs;
mod codegen;
mod kind;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(DynamormModel, attributes(dynamorm))]
pub fn derive_dynamorm_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    codegen::derive(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
