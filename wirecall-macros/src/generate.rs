//! Code generation for the wirecall macros.
//!
//! This module generates:
//! - Client proxy stubs that marshal arguments through an endpoint
//! - Handler bindings that decode arguments and dispatch to a trait impl
//! - `WireEncode`/`WireDecode` impls for `#[derive(Wire)]` types

use crate::parse::{InterfaceDef, MethodDef, ShapeDef};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Error, Fields, Ident, Result};

fn shape_tokens(shape: &ShapeDef) -> TokenStream {
    match shape {
        ShapeDef::None => quote! { ::wirecall::registry::ReturnShape::None },
        ShapeDef::Unit => quote! { ::wirecall::registry::ReturnShape::Unit },
        ShapeDef::Typed(_) => quote! { ::wirecall::registry::ReturnShape::Typed },
        ShapeDef::FallibleUnit => quote! { ::wirecall::registry::ReturnShape::FallibleUnit },
        ShapeDef::FallibleTyped(_) => {
            quote! { ::wirecall::registry::ReturnShape::FallibleTyped }
        }
    }
}

/// Generate the `{Trait}Client` proxy stub.
pub fn generate_client(def: &InterfaceDef) -> TokenStream {
    let vis = &def.vis;
    let client_name = format_ident!("{}Client", def.name);
    let trait_name_str = def.name.to_string();
    let ordinal = def.ordinal;

    let method_descriptors = def.methods.iter().map(|method| {
        let name_str = method.name.to_string();
        let params = method.params.iter().map(|param| {
            let param_name = param.name.to_string();
            let nullable = param.nullable;
            quote! { ::wirecall::registry::ParamDescriptor::new(#param_name, #nullable) }
        });
        let shape = shape_tokens(&method.shape);
        quote! {
            ::wirecall::registry::MethodDescriptor::new(
                #name_str,
                ::std::vec![#(#params),*],
                #shape,
            )
        }
    });

    let methods = def
        .methods
        .iter()
        .map(|method| generate_client_method(ordinal, method));

    let client_doc = format!("Proxy stub for the `{}` interface.", def.name);

    quote! {
        #[doc = #client_doc]
        #[derive(Clone)]
        #vis struct #client_name {
            endpoint: ::wirecall::Endpoint,
        }

        impl #client_name {
            /// The interface descriptor, for registry construction.
            pub fn descriptor() -> ::wirecall::registry::InterfaceDescriptor {
                ::wirecall::registry::InterfaceDescriptor::new(
                    #ordinal,
                    #trait_name_str,
                    ::std::vec![#(#method_descriptors),*],
                )
            }

            #(#methods)*
        }

        impl ::wirecall::ProxyStub for #client_name {
            fn descriptor() -> ::wirecall::registry::InterfaceDescriptor {
                #client_name::descriptor()
            }

            fn bind(endpoint: ::wirecall::Endpoint) -> Self {
                Self { endpoint }
            }
        }
    }
}

fn generate_client_method(ordinal: u8, method: &MethodDef) -> TokenStream {
    let name = &method.name;
    let index = method.index;
    let args = method.params.iter().map(|param| {
        let param_name = &param.name;
        let ty = &param.ty;
        quote! { #param_name: #ty }
    });
    let pushes = method.params.iter().map(|param| {
        let param_name = &param.name;
        quote! { call.push_arg(&#param_name)?; }
    });

    let (ret, finish) = match &method.shape {
        ShapeDef::None => (quote! { () }, quote! { call.finish() }),
        ShapeDef::Unit => (
            quote! { ::wirecall::CallFuture },
            quote! { call.finish_unit() },
        ),
        ShapeDef::Typed(ty) => (
            quote! { ::wirecall::TypedCallFuture<#ty> },
            quote! { call.finish_typed::<#ty>() },
        ),
        ShapeDef::FallibleUnit => (
            quote! { ::wirecall::FallibleCallFuture },
            quote! { call.finish_fallible() },
        ),
        ShapeDef::FallibleTyped(ty) => (
            quote! { ::wirecall::TypedFallibleCallFuture<#ty> },
            quote! { call.finish_fallible_typed::<#ty>() },
        ),
    };

    let binding = if method.params.is_empty() {
        quote! { let call = self.endpoint.begin_call(#ordinal, #index)?; }
    } else {
        quote! { let mut call = self.endpoint.begin_call(#ordinal, #index)?; }
    };

    let doc = format!(
        "Calls `{}` (method index {}) on the bound endpoint.",
        name, index
    );

    quote! {
        #[doc = #doc]
        pub fn #name(&self, #(#args),*) -> ::std::result::Result<#ret, ::wirecall::EndpointError> {
            #binding
            #(#pushes)*
            #finish
        }
    }
}

/// Generate the `{Trait}Binding` handler adapter.
pub fn generate_binding(def: &InterfaceDef) -> TokenStream {
    let vis = &def.vis;
    let trait_name = &def.name;
    let binding_name = format_ident!("{}Binding", def.name);
    let ordinal = def.ordinal;

    let arms = def.methods.iter().map(|method| {
        let index = method.index;
        let name = &method.name;
        let decodes = method.params.iter().map(|param| {
            let param_name = &param.name;
            let ty = &param.ty;
            quote! {
                let #param_name = <#ty as ::wirecall::WireDecode>::decode(call.args())?;
            }
        });
        let invoke_args = method.params.iter().map(|param| &param.name);

        if matches!(method.shape, ShapeDef::None) {
            quote! {
                #index => {
                    #(#decodes)*
                    #trait_name::#name(&self.service, #(#invoke_args),*);
                    ::std::result::Result::Ok(::std::option::Option::None)
                }
            }
        } else {
            quote! {
                #index => {
                    #(#decodes)*
                    let reply = #trait_name::#name(&self.service, #(#invoke_args),*);
                    ::std::result::Result::Ok(::std::option::Option::Some(
                        ::std::boxed::Box::new(reply),
                    ))
                }
            }
        }
    });

    let binding_doc = format!(
        "Handler binding dispatching `{}` call frames to a service implementation.",
        def.name
    );

    quote! {
        #[doc = #binding_doc]
        #vis struct #binding_name<H> {
            service: H,
        }

        impl<H: #trait_name> #binding_name<H> {
            /// Wraps a service implementation for handler registration.
            pub fn new(service: H) -> Self {
                Self { service }
            }
        }

        impl<H> ::wirecall::Handler for #binding_name<H>
        where
            H: #trait_name + ::std::marker::Send + ::std::marker::Sync,
        {
            fn ordinals(&self) -> ::std::vec::Vec<u8> {
                ::std::vec![#ordinal]
            }

            fn dispatch(
                &self,
                call: &mut ::wirecall::InboundCall<'_, '_>,
            ) -> ::std::result::Result<
                ::std::option::Option<::std::boxed::Box<dyn ::wirecall::ReplyEncode>>,
                ::wirecall::EndpointError,
            > {
                match call.method_index() {
                    #(#arms)*
                    other => ::std::result::Result::Err(
                        ::wirecall::EndpointError::unknown_method(#ordinal, other),
                    ),
                }
            }
        }
    }
}

/// Generate `WireEncode`/`WireDecode` impls for `#[derive(Wire)]`.
pub fn generate_wire_impl(input: &DeriveInput) -> Result<TokenStream> {
    match &input.data {
        Data::Struct(data) => generate_struct_wire(input, &data.fields),
        Data::Enum(_) => generate_enum_wire(input),
        Data::Union(_) => Err(Error::new_spanned(
            input,
            "#[derive(Wire)] does not support unions",
        )),
    }
}

fn generate_struct_wire(input: &DeriveInput, fields: &Fields) -> Result<TokenStream> {
    let name = &input.ident;

    let (encodes, decode_body): (Vec<TokenStream>, TokenStream) = match fields {
        Fields::Named(named) => {
            let encodes = named
                .named
                .iter()
                .map(|field| {
                    let field_name = field.ident.as_ref().expect("named field");
                    quote! { ::wirecall::WireEncode::encode(&self.#field_name, w)?; }
                })
                .collect();
            let decodes = named.named.iter().map(|field| {
                let field_name = field.ident.as_ref().expect("named field");
                let ty = &field.ty;
                quote! { #field_name: <#ty as ::wirecall::WireDecode>::decode(r)?, }
            });
            (encodes, quote! { Self { #(#decodes)* } })
        }
        Fields::Unnamed(unnamed) => {
            let encodes = unnamed
                .unnamed
                .iter()
                .enumerate()
                .map(|(position, _)| {
                    let position = syn::Index::from(position);
                    quote! { ::wirecall::WireEncode::encode(&self.#position, w)?; }
                })
                .collect();
            let decodes = unnamed.unnamed.iter().map(|field| {
                let ty = &field.ty;
                quote! { <#ty as ::wirecall::WireDecode>::decode(r)?, }
            });
            (encodes, quote! { Self(#(#decodes)*) })
        }
        Fields::Unit => (Vec::new(), quote! { Self }),
    };

    let mut encode_generics = input.generics.clone();
    for type_param in encode_generics.type_params_mut() {
        type_param.bounds.push(syn::parse_quote!(::wirecall::WireEncode));
    }
    let (encode_impl, _, _) = encode_generics.split_for_impl();

    let mut decode_generics = input.generics.clone();
    for type_param in decode_generics.type_params_mut() {
        type_param.bounds.push(syn::parse_quote!(::wirecall::WireDecode));
    }
    let (decode_impl, _, _) = decode_generics.split_for_impl();

    let (_, ty_generics, where_clause) = input.generics.split_for_impl();

    // Fieldless structs never touch the writer or reader.
    let (w_param, r_param) = if encodes.is_empty() {
        (quote! { _w }, quote! { _r })
    } else {
        (quote! { w }, quote! { r })
    };

    Ok(quote! {
        impl #encode_impl ::wirecall::WireEncode for #name #ty_generics #where_clause {
            fn encode(
                &self,
                #w_param: &mut ::wirecall::WireWriter,
            ) -> ::std::result::Result<(), ::wirecall::CodecError> {
                #(#encodes)*
                ::std::result::Result::Ok(())
            }
        }

        impl #decode_impl ::wirecall::WireDecode for #name #ty_generics #where_clause {
            fn decode(
                #r_param: &mut ::wirecall::WireReader<'_>,
            ) -> ::std::result::Result<Self, ::wirecall::CodecError> {
                ::std::result::Result::Ok(#decode_body)
            }
        }
    })
}

fn generate_enum_wire(input: &DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let Data::Enum(data) = &input.data else {
        unreachable!("generate_enum_wire called with a non-enum");
    };
    if data.variants.is_empty() {
        return Err(Error::new_spanned(
            input,
            "#[derive(Wire)] requires at least one enum variant",
        ));
    }

    let mut variants: Vec<&Ident> = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "#[derive(Wire)] enums must be fieldless",
            ));
        }
        variants.push(&variant.ident);
    }

    let repr = enum_repr(input)?;

    let encode_arms = variants.iter().map(|variant| {
        quote! { Self::#variant => Self::#variant as #repr, }
    });
    let decode_checks = variants.iter().map(|variant| {
        quote! {
            if raw == Self::#variant as #repr {
                return ::std::result::Result::Ok(Self::#variant);
            }
        }
    });

    Ok(quote! {
        impl ::wirecall::WireEncode for #name {
            fn encode(
                &self,
                w: &mut ::wirecall::WireWriter,
            ) -> ::std::result::Result<(), ::wirecall::CodecError> {
                let raw = match self { #(#encode_arms)* };
                ::wirecall::WireEncode::encode(&raw, w)
            }
        }

        impl ::wirecall::WireDecode for #name {
            fn decode(
                r: &mut ::wirecall::WireReader<'_>,
            ) -> ::std::result::Result<Self, ::wirecall::CodecError> {
                let raw = <#repr as ::wirecall::WireDecode>::decode(r)?;
                #(#decode_checks)*
                ::std::result::Result::Err(::wirecall::CodecError::InvalidEnumValue {
                    type_name: #name_str,
                    value: raw as i64,
                })
            }
        }
    })
}

/// The enum's declared `#[repr]` integer, defaulting to `i32`.
fn enum_repr(input: &DeriveInput) -> Result<TokenStream> {
    const SUPPORTED: &[&str] = &["u8", "i8", "u16", "i16", "u32", "i32", "u64", "i64"];
    for attr in &input.attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        let ident: Ident = attr.parse_args()?;
        if SUPPORTED.contains(&ident.to_string().as_str()) {
            return Ok(quote! { #ident });
        }
        return Err(Error::new_spanned(
            attr,
            "#[derive(Wire)] enums need an integer repr (u8..u64, i8..i64)",
        ));
    }
    Ok(quote! { i32 })
}
