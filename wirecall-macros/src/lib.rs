//! Procedural macros for the wirecall framework.
//!
//! This crate provides the `#[wirecall::interface]` attribute macro that
//! generates client stubs, handler bindings and interface descriptors from
//! trait definitions, and the `#[derive(Wire)]` macro that gives user value
//! types their field-ordered wire codec.
//!
//! # Example
//!
//! ```ignore
//! use wirecall::{interface, TypedCallFuture};
//!
//! #[interface(ordinal = 2)]
//! trait Probe {
//!     fn is_ok(&self, a: bool) -> TypedCallFuture<bool>;
//!     fn test(&self, i: i32);
//! }
//! ```
//!
//! This will generate:
//! - A `ProbeClient` proxy stub with one method per trait method
//! - A `ProbeBinding<H>` handler adapter implementing `wirecall::Handler`
//! - A `ProbeClient::descriptor()` constructor for registry building

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, DeriveInput, ItemTrait, Meta, Token};

mod generate;
mod parse;

/// The `#[wirecall::interface]` attribute macro.
///
/// Turns a trait declaration into a complete RPC interface:
/// - A `{Trait}Client` proxy stub bound to an endpoint
/// - A `{Trait}Binding<H>` adapter dispatching inbound calls to a `H: Trait`
/// - The interface descriptor, with method indices following declaration
///   order and option-typed parameters marked nullable
///
/// # Attributes
///
/// - `ordinal`: the interface's stable 7-bit ordinal (1..=127), required.
///
/// # Method shapes
///
/// Interface methods take `&self` and return one of: nothing
/// (fire-and-forget), `CallFuture`, `TypedCallFuture<T>`,
/// `FallibleCallFuture` or `TypedFallibleCallFuture<T>`.
#[proc_macro_attribute]
pub fn interface(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemTrait);

    // Parse attribute arguments
    let attr_args: Vec<Meta> = if attr.is_empty() {
        Vec::new()
    } else {
        match syn::parse::Parser::parse(Punctuated::<Meta, Token![,]>::parse_terminated, attr) {
            Ok(args) => args.into_iter().collect(),
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let def = match parse::parse_interface(&input, &attr_args) {
        Ok(def) => def,
        Err(err) => return err.to_compile_error().into(),
    };

    let client = generate::generate_client(&def);
    let binding = generate::generate_binding(&def);

    let expanded = quote! {
        #input

        #client

        #binding
    };

    TokenStream::from(expanded)
}

/// The `#[derive(Wire)]` macro.
///
/// Implements `WireEncode` and `WireDecode` for a struct (fields in
/// declaration order — the order is the wire layout, on both peers) or for
/// a fieldless enum (serialized as its `#[repr]` integer, `i32` when no
/// repr is given).
#[proc_macro_derive(Wire)]
pub fn derive_wire(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match generate::generate_wire_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
