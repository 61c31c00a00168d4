extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, parse_macro_input};

/// Implements `flatorm::Record` and `flatorm::FromColumns` for a flat struct.
///
/// ```ignore
/// #[derive(Record)]
/// #[table_name = "library_books"]
/// pub struct Book {
///     #[column = "id"]
///     pub id: i64,
///     #[column = "author"]
///     pub author: String,
/// }
/// ```
///
/// Every field needs a `#[column = "..."]` name and a type implementing
/// `ToColumn` and `FromColumn`.
#[proc_macro_derive(Record, attributes(column, table_name))]
pub fn derive_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Reads `#[name = "value"]`, if present.
fn string_attr(attrs: &[Attribute], name: &str) -> syn::Result<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident(name) {
            continue;
        }
        if let Meta::NameValue(nv) = &attr.meta {
            if let Expr::Lit(expr_lit) = &nv.value {
                if let Lit::Str(litstr) = &expr_lit.lit {
                    return Ok(Some(litstr.value()));
                }
            }
        }
        return Err(syn::Error::new_spanned(
            attr,
            format!("expected #[{name} = \"...\"]"),
        ));
    }
    Ok(None)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let type_name = struct_name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Record needs a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Record can only be derived for structs",
            ));
        }
    };

    let table_override = match string_attr(&input.attrs, "table_name")? {
        Some(name) => quote! { ::core::option::Option::Some(#name) },
        None => quote! { ::core::option::Option::None },
    };

    let mut layout_fields = Vec::new();
    let mut decoded_fields = Vec::new();
    for f in fields {
        let ident = f
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(f, "field has no name"))?;
        let ident_name = ident.to_string();
        let column = match string_attr(&f.attrs, "column")? {
            Some(column) if !column.is_empty() => column,
            _ => {
                return Err(syn::Error::new_spanned(
                    f,
                    format!(
                        "field `{ident_name}` needs a column name, ex: #[column = \"{}\"]",
                        ident_name.to_lowercase()
                    ),
                ));
            }
        };
        let ty = &f.ty;

        layout_fields.push(quote! {
            ::flatorm::Field::annotated(
                #ident_name,
                #column,
                <#ty as ::flatorm::ToColumn>::to_field_value(&self.#ident),
            )
        });
        decoded_fields.push(quote! {
            #ident: ::flatorm::decode_column::<#ty>(row, #column)?
        });
    }

    Ok(quote! {
        impl #impl_generics ::flatorm::Record for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &str {
                #type_name
            }

            fn layout(&self) -> ::flatorm::Layout {
                ::flatorm::Layout::Struct(::std::vec![#(#layout_fields),*])
            }

            fn table_override(&self) -> ::core::option::Option<&str> {
                #table_override
            }
        }

        impl #impl_generics ::flatorm::FromColumns for #struct_name #ty_generics #where_clause {
            fn from_columns(row: &::flatorm::RowMap) -> ::flatorm::Result<Self> {
                ::core::result::Result::Ok(Self {
                    #(#decoded_fields),*
                })
            }
        }
    })
}
