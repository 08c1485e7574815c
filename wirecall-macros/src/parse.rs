//! Parsing logic for the `#[wirecall::interface]` macro.
//!
//! This module extracts the information needed to generate client stubs,
//! handler bindings and interface descriptors from a trait definition.

use proc_macro2::Span;
use syn::{
    Error, Expr, ExprLit, FnArg, GenericArgument, Ident, ItemTrait, Lit, Meta, MetaNameValue,
    Pat, PatType, PathArguments, PathSegment, Result, ReturnType, TraitItem, TraitItemFn, Type,
    Visibility,
};

/// Parsed interface definition.
pub struct InterfaceDef {
    /// Interface name (trait name)
    pub name: Ident,
    /// Visibility of the trait, applied to the generated types
    pub vis: Visibility,
    /// The interface's 7-bit ordinal
    pub ordinal: u8,
    /// Interface methods, in declaration order
    pub methods: Vec<MethodDef>,
}

/// Parsed method definition.
pub struct MethodDef {
    /// Method name
    pub name: Ident,
    /// Wire index, assigned from declaration order
    pub index: u8,
    /// Method parameters (excluding self)
    pub params: Vec<ParamDef>,
    /// Return shape
    pub shape: ShapeDef,
}

/// Parsed parameter definition.
pub struct ParamDef {
    /// Parameter name
    pub name: Ident,
    /// Parameter type
    pub ty: Type,
    /// Whether the parameter is option-typed, and therefore nullable
    pub nullable: bool,
}

/// The declared return shape of a method.
pub enum ShapeDef {
    /// Fire-and-forget
    None,
    /// `CallFuture`
    Unit,
    /// `TypedCallFuture<T>`
    Typed(Type),
    /// `FallibleCallFuture`
    FallibleUnit,
    /// `TypedFallibleCallFuture<T>`
    FallibleTyped(Type),
}

/// Parse the trait definition and attribute arguments.
pub fn parse_interface(trait_def: &ItemTrait, attr_args: &[Meta]) -> Result<InterfaceDef> {
    let mut ordinal: Option<u8> = None;

    for meta in attr_args {
        match meta {
            Meta::NameValue(MetaNameValue {
                path,
                value: Expr::Lit(ExprLit { lit, .. }),
                ..
            }) if path.is_ident("ordinal") => {
                if let Lit::Int(lit_int) = lit {
                    let value: u8 = lit_int.base10_parse()?;
                    if value == 0 || value > 127 {
                        return Err(Error::new_spanned(
                            lit_int,
                            "interface ordinal must be in 1..=127",
                        ));
                    }
                    ordinal = Some(value);
                } else {
                    return Err(Error::new_spanned(
                        lit,
                        "ordinal attribute must be an integer literal",
                    ));
                }
            }
            other => {
                return Err(Error::new_spanned(
                    other,
                    "unsupported attribute; expected `ordinal = N`",
                ));
            }
        }
    }

    let ordinal = ordinal.ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "missing `ordinal = N` attribute on #[interface]",
        )
    })?;

    let mut methods = Vec::new();
    for item in &trait_def.items {
        let TraitItem::Fn(method) = item else {
            return Err(Error::new_spanned(
                item,
                "an interface trait may only contain methods",
            ));
        };
        if methods.len() == 256 {
            return Err(Error::new_spanned(
                method,
                "an interface may declare at most 256 methods",
            ));
        }
        methods.push(parse_method(method, methods.len() as u8)?);
    }

    Ok(InterfaceDef {
        name: trait_def.ident.clone(),
        vis: trait_def.vis.clone(),
        ordinal,
        methods,
    })
}

fn parse_method(method: &TraitItemFn, index: u8) -> Result<MethodDef> {
    if method.sig.asyncness.is_some() {
        return Err(Error::new_spanned(
            &method.sig,
            "interface methods are synchronous; return a call future instead",
        ));
    }

    let mut inputs = method.sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(Error::new_spanned(
                &method.sig,
                "interface methods take `&self`",
            ));
        }
    }

    let mut params = Vec::new();
    for input in inputs {
        let FnArg::Typed(PatType { pat, ty, .. }) = input else {
            return Err(Error::new_spanned(input, "unexpected receiver"));
        };
        let Pat::Ident(pat_ident) = pat.as_ref() else {
            return Err(Error::new_spanned(
                pat,
                "parameter patterns are not supported; use a plain name",
            ));
        };
        params.push(ParamDef {
            name: pat_ident.ident.clone(),
            ty: (**ty).clone(),
            nullable: is_option(ty),
        });
    }

    Ok(MethodDef {
        name: method.sig.ident.clone(),
        index,
        params,
        shape: parse_shape(&method.sig.output)?,
    })
}

fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

fn last_segment(ty: &Type) -> Option<&PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn parse_shape(output: &ReturnType) -> Result<ShapeDef> {
    let ty = match output {
        ReturnType::Default => return Ok(ShapeDef::None),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    if let Type::Tuple(tuple) = ty {
        if tuple.elems.is_empty() {
            return Ok(ShapeDef::None);
        }
    }
    let Some(segment) = last_segment(ty) else {
        return Err(shape_error(ty));
    };
    match segment.ident.to_string().as_str() {
        "CallFuture" => Ok(ShapeDef::Unit),
        "FallibleCallFuture" => Ok(ShapeDef::FallibleUnit),
        "TypedCallFuture" => Ok(ShapeDef::Typed(generic_arg(segment)?)),
        "TypedFallibleCallFuture" => Ok(ShapeDef::FallibleTyped(generic_arg(segment)?)),
        _ => Err(shape_error(ty)),
    }
}

fn generic_arg(segment: &PathSegment) -> Result<Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        for arg in &args.args {
            if let GenericArgument::Type(ty) = arg {
                return Ok(ty.clone());
            }
        }
    }
    Err(Error::new_spanned(
        segment,
        "expected a result type argument, e.g. TypedCallFuture<i32>",
    ))
}

fn shape_error(ty: &Type) -> Error {
    Error::new_spanned(
        ty,
        "interface methods return (), CallFuture, TypedCallFuture<T>, \
         FallibleCallFuture or TypedFallibleCallFuture<T>",
    )
}
