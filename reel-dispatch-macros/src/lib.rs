//! Procedural macros for reel-dispatch

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Case convention applied to every variant name
    #[darling(default)]
    rename_all: Option<String>,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit kind name, wins over `rename_all`
    #[darling(default)]
    rename: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum RenameRule {
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        match rule {
            "PascalCase" => Some(Self::Pascal),
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "kebab-case" => Some(Self::Kebab),
            _ => None,
        }
    }

    fn apply(self, variant: &str) -> String {
        match self {
            Self::Pascal => variant.to_string(),
            Self::Snake => split_pascal_case(variant)
                .iter()
                .map(|p| p.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::ScreamingSnake => split_pascal_case(variant)
                .iter()
                .map(|p| p.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::Kebab => split_pascal_case(variant)
                .iter()
                .map(|p| p.to_lowercase())
                .collect::<Vec<_>>()
                .join("-"),
        }
    }
}

/// Split a PascalCase identifier into words.
///
/// Digits stay attached to the preceding word: `FetchPage2` -> `Fetch`, `Page2`.
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        if ch != '_' {
            current.push(ch);
        } else if !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Derive macro for the Action trait
///
/// Generates `name()`, returning the action kind, and an inherent
/// `kinds()` listing every kind of the enum in declaration order.
///
/// By default the kind is the variant name. `#[action(rename_all = "...")]`
/// on the enum applies a case convention (`PascalCase`, `snake_case`,
/// `SCREAMING_SNAKE_CASE`, `kebab-case`); `#[action(rename = "...")]` on a
/// variant sets its kind explicitly. Two variants may not share a kind.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(rename_all = "SCREAMING_SNAKE_CASE")]
/// enum MovieAction {
///     FetchMovieList { page: u32 },
///     #[action(rename = "FETCH_DATA_SUCCESS")]
///     PageLoaded(Vec<u64>),
/// }
///
/// assert_eq!(MovieAction::FetchMovieList { page: 1 }.name(), "FETCH_MOVIE_LIST");
/// assert_eq!(MovieAction::PageLoaded(vec![]).name(), "FETCH_DATA_SUCCESS");
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let rule = match opts.rename_all.as_deref() {
        None => RenameRule::Pascal,
        Some(raw) => match RenameRule::parse(raw) {
            Some(rule) => rule,
            None => {
                return syn::Error::new_spanned(
                    &input.ident,
                    format!(
                        "unknown rename_all rule {:?}; expected PascalCase, snake_case, \
                         SCREAMING_SNAKE_CASE or kebab-case",
                        raw
                    ),
                )
                .to_compile_error()
                .into();
            }
        },
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut seen = HashSet::new();
    let mut kinds = Vec::with_capacity(variants.len());
    for v in variants.iter() {
        let kind = v
            .rename
            .clone()
            .unwrap_or_else(|| rule.apply(&v.ident.to_string()));
        if !seen.insert(kind.clone()) {
            return syn::Error::new_spanned(
                &v.ident,
                format!("duplicate action kind {:?}", kind),
            )
            .to_compile_error()
            .into();
        }
        kinds.push(kind);
    }

    let name_arms = variants.iter().zip(kinds.iter()).map(|(v, kind)| {
        let variant_name = &v.ident;
        match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #kind
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #kind
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #kind
            },
        }
    });

    let kinds_doc = format!("Every action kind of [`{}`], in declaration order.", name);

    let expanded = quote! {
        impl reel_dispatch::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }
        }

        impl #name {
            #[doc = #kinds_doc]
            pub fn kinds() -> &'static [&'static str] {
                &[#(#kinds),*]
            }
        }
    };

    TokenStream::from(expanded)
}
