//! Record derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

struct BoundField<'a> {
    ident: &'a syn::Ident,
    column: String,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut bound = Vec::new();
    let mut seen: HashMap<String, &syn::Field> = HashMap::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let Some(column) = column_binding(field, ident)? else {
            continue;
        };
        if let Some(first) = seen.get(&column) {
            let mut err = syn::Error::new_spanned(
                field,
                format!("column `{column}` is already bound to another field"),
            );
            err.combine(syn::Error::new_spanned(first, "first bound here"));
            return Err(err);
        }
        seen.insert(column.clone(), field);
        bound.push(BoundField { ident, column });
    }

    let columns = bound.iter().map(|f| &f.column);
    let arms = bound.iter().enumerate().map(|(index, f)| {
        let ident = f.ident;
        quote! {
            #index => ::core::option::Option::Some(
                ::dbkit::record::AsSlot::as_slot(&mut self.#ident)
            ),
        }
    });

    Ok(quote! {
        impl #impl_generics ::dbkit::Record for #name #ty_generics #where_clause {
            const COLUMNS: &'static [&'static str] = &[#(#columns),*];

            fn field(&mut self, index: usize) -> ::core::option::Option<::dbkit::FieldSlot<'_>> {
                match index {
                    #(#arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

/// Column bound to `field`: `None` for `#[orm(skip)]`, the `#[orm(column = "...")]`
/// value when given, the field name otherwise.
fn column_binding(field: &syn::Field, ident: &syn::Ident) -> Result<Option<String>> {
    let mut column = None;
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("column name cannot be empty"));
                }
                column = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `column = \"...\"` or `skip`"))
            }
        })?;
    }

    if skip {
        return Ok(None);
    }
    Ok(Some(column.unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string())))
}
