//! Derive macros for the wirepack binary serialization library.
//!
//! `#[derive(Encode)]` and `#[derive(Decode)]` generate positional
//! field-by-field serialization for structs and discriminant-based
//! serialization for fieldless enums. Nothing is written between fields:
//! the wire layout is the declaration order, with one exception — a field
//! marked `#[wirepack(ancestor)]` is serialized before all other fields,
//! letting a type prefix its layout with a parent type's encoding.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Ident, Token};

/// Returns true if the field carries `#[wirepack(ancestor)]`.
///
/// Unknown `#[wirepack(...)]` attribute contents are a compile error.
fn is_ancestor_field(field: &Field) -> bool {
    let mut found = false;
    for attr in &field.attrs {
        if attr.path().is_ident("wirepack") {
            let parsed = attr.parse_args_with(|input: syn::parse::ParseStream| {
                while !input.is_empty() {
                    let ident = input.parse::<Ident>()?;
                    if ident == "ancestor" {
                        found = true;
                    } else {
                        return Err(syn::Error::new(
                            ident.span(),
                            format!("Unknown wirepack attribute: {}", ident),
                        ));
                    }
                    if input.peek(Token![,]) {
                        input.parse::<Token![,]>()?;
                    }
                }
                Ok(())
            });
            if let Err(e) = parsed {
                panic!("{}", e);
            }
        }
    }
    found
}

/// Field indices in wire order: the ancestor field (at most one) first,
/// then the remaining fields in declaration order.
fn wire_order(fields: &Punctuated<Field, Token![,]>, type_name: &Ident) -> Vec<usize> {
    let mut ancestor = None;
    for (i, f) in fields.iter().enumerate() {
        if is_ancestor_field(f) {
            if ancestor.is_some() {
                panic!(
                    "More than one #[wirepack(ancestor)] field on '{}'. A composite designates at most one ancestor.",
                    type_name
                );
            }
            ancestor = Some(i);
        }
    }
    let mut order = Vec::with_capacity(fields.len());
    if let Some(a) = ancestor {
        order.push(a);
    }
    order.extend((0..fields.len()).filter(|i| Some(*i) != ancestor));
    order
}

/// Collects the variant idents of a fieldless enum, rejecting variants
/// that carry data: with no tags on the wire there is nothing to select a
/// payload shape from, so only unit variants can participate.
fn fieldless_variants(data: &syn::DataEnum, type_name: &Ident) -> Vec<Ident> {
    data.variants
        .iter()
        .map(|v| match v.fields {
            Fields::Unit => v.ident.clone(),
            _ => panic!(
                "Cannot derive wirepack for enum '{}': variant '{}' carries data. Only fieldless enums are supported.",
                type_name, v.ident
            ),
        })
        .collect()
}

/// Returns true when the type has no fields at all, so the generated
/// method body would leave its buffer parameter untouched.
fn has_no_fields(data: &Data) -> bool {
    match data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(f) => f.named.is_empty(),
            Fields::Unnamed(f) => f.unnamed.is_empty(),
            Fields::Unit => true,
        },
        _ => false,
    }
}

/// Derives `wirepack::Encoder`, writing fields positionally with the
/// ancestor field (if any) first.
#[proc_macro_derive(Encode, attributes(wirepack))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let encode_body = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields) => {
                let field_encode = wire_order(&fields.named, name).into_iter().map(|i| {
                    let ident = fields.named[i].ident.as_ref().unwrap();
                    quote! {
                        wirepack::Encoder::encode(&self.#ident, writer);
                    }
                });
                quote! { #(#field_encode)* }
            }
            Fields::Unnamed(fields) => {
                let field_encode = wire_order(&fields.unnamed, name).into_iter().map(|i| {
                    let index = syn::Index::from(i);
                    quote! {
                        wirepack::Encoder::encode(&self.#index, writer);
                    }
                });
                quote! { #(#field_encode)* }
            }
            Fields::Unit => quote! {},
        },
        Data::Enum(e) => {
            let variants = fieldless_variants(e, name);
            quote! {
                let value = match self {
                    #( #name::#variants => #name::#variants as u32, )*
                };
                wirepack::varint::put_varint32(writer, value);
            }
        }
        Data::Union(_) => panic!("Cannot derive wirepack for union '{}'.", name),
    };

    let writer = if has_no_fields(&input.data) {
        quote! { _writer }
    } else {
        quote! { writer }
    };
    let expanded = quote! {
        impl #impl_generics wirepack::Encoder for #name #ty_generics #where_clause {
            fn encode(&self, #writer: &mut wirepack::bytes::BytesMut) {
                #encode_body
            }
        }
    };
    TokenStream::from(expanded)
}

/// Derives `wirepack::Decoder`, reading fields in the same wire order as
/// `Encode` and short-circuiting on the first failure.
#[proc_macro_derive(Decode, attributes(wirepack))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let decode_body = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(fields) => {
                // Struct literal fields evaluate in written order, so
                // emitting them in wire order decodes the ancestor first
                // and `?` aborts before any later field is touched.
                let field_decode = wire_order(&fields.named, name).into_iter().map(|i| {
                    let f = &fields.named[i];
                    let ident = f.ident.as_ref().unwrap();
                    let ty = &f.ty;
                    quote! {
                        #ident: <#ty as wirepack::Decoder>::decode(reader)?,
                    }
                });
                quote! {
                    Ok(#name {
                        #(#field_decode)*
                    })
                }
            }
            Fields::Unnamed(fields) => {
                let order = wire_order(&fields.unnamed, name);
                let bindings = order.iter().map(|&i| {
                    let f = &fields.unnamed[i];
                    let ty = &f.ty;
                    let binding = Ident::new(&format!("field{}", i), proc_macro2::Span::call_site());
                    quote! {
                        let #binding = <#ty as wirepack::Decoder>::decode(reader)?;
                    }
                });
                let constructor_args = (0..fields.unnamed.len()).map(|i| {
                    Ident::new(&format!("field{}", i), proc_macro2::Span::call_site())
                });
                quote! {
                    #(#bindings)*
                    Ok(#name(#(#constructor_args),*))
                }
            }
            Fields::Unit => quote! { Ok(#name) },
        },
        Data::Enum(e) => {
            let variants = fieldless_variants(e, name);
            quote! {
                let value = wirepack::varint::get_varint32(reader)?;
                match value {
                    #( v if v == #name::#variants as u32 => Ok(#name::#variants), )*
                    other => Err(wirepack::DecodeError::Decode(format!(
                        "Unknown value {} for enum {}",
                        other,
                        stringify!(#name)
                    ))),
                }
            }
        }
        Data::Union(_) => panic!("Cannot derive wirepack for union '{}'.", name),
    };

    let reader = if has_no_fields(&input.data) {
        quote! { _reader }
    } else {
        quote! { reader }
    };
    let expanded = quote! {
        impl #impl_generics wirepack::Decoder for #name #ty_generics #where_clause {
            fn decode(#reader: &mut wirepack::bytes::Bytes) -> wirepack::Result<Self> {
                #decode_body
            }
        }
    };
    TokenStream::from(expanded)
}
