use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Expr, Ident, Token, braced,
    parse::{Parse, ParseStream},
};

pub struct TokenPatternsInput {
    pub mod_name: Ident,
    pub entries: Vec<PatternEntry>,
}

pub struct PatternEntry {
    pub skip: bool,
    pub name: Ident,
    pub pattern_expr: Expr,
}

impl Parse for PatternEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut skip = false;
        while input.peek(Token![#]) {
            let attrs = input.call(syn::Attribute::parse_outer)?;
            for attr in attrs {
                if attr.path().is_ident("skip") {
                    skip = true;
                } else {
                    return Err(syn::Error::new_spanned(attr, "unknown attribute, expected `#[skip]`"));
                }
            }
        }
        let name: Ident = input.parse()?;
        input.parse::<Token![=>]>()?;
        let pattern_expr: Expr = input.parse()?;
        Ok(Self {
            skip,
            name,
            pattern_expr,
        })
    }
}

impl Parse for TokenPatternsInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mod_name: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let content;
        braced!(content in input);
        let mut entries = Vec::new();
        while !content.is_empty() {
            entries.push(content.parse()?);
            if content.peek(Token![,]) {
                content.parse::<Token![,]>()?;
            }
        }
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        Ok(Self { mod_name, entries })
    }
}

fn shout_case(ident: &Ident) -> Ident {
    let s = ident.to_string();
    let mut out = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    format_ident!("{}", out)
}

pub fn expand(input: TokenPatternsInput) -> syn::Result<TokenStream> {
    let TokenPatternsInput { mod_name, entries } = input;

    if entries.is_empty() {
        return Err(syn::Error::new_spanned(mod_name, "token_patterns! requires at least one entry"));
    }

    let id_consts: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let id = i as u32;
            let const_name = shout_case(&e.name);
            quote! { pub const #const_name: u32 = #id; }
        })
        .collect();

    let pattern_consts: Vec<_> = entries
        .iter()
        .map(|e| {
            let const_name = format_ident!("{}_PATTERN", shout_case(&e.name));
            let expr = &e.pattern_expr;
            quote! { const #const_name: ::lexforge_core::pattern::Pattern = #expr; }
        })
        .collect();

    let table_entries: Vec<_> = entries
        .iter()
        .map(|e| {
            let id_const = shout_case(&e.name);
            let pattern_const = format_ident!("{}_PATTERN", shout_case(&e.name));
            let name_str = e.name.to_string();
            quote! {
                ::lexforge_core::memstream::NamedPattern {
                    id: #id_const,
                    name: #name_str,
                    pattern: &#pattern_const,
                }
            }
        })
        .collect();

    let skip_ids: Vec<_> = entries
        .iter()
        .filter(|e| e.skip)
        .map(|e| shout_case(&e.name))
        .collect();

    Ok(quote! {
        pub mod #mod_name {
            #(#id_consts)*

            #(#pattern_consts)*

            pub static PATTERNS: &[::lexforge_core::memstream::NamedPattern] = &[
                #(#table_entries),*
            ];

            pub static SKIP: &[u32] = &[#(#skip_ids),*];
        }
    })
}
