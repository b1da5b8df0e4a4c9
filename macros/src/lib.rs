#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Procedural macros for the lexforge tokenization and parsing toolkit.
//!
//! [`token_patterns!`] builds a named, const `Pattern` table at compile time:
//! a module of numeric token-id constants plus a `&'static [NamedPattern]`
//! table and a skip-set, ready to hand to `MemTokenStream`, `StreamingTokenizer`,
//! or `Parser`.
//!
//! ```ignore
//! use lexforge_core::charclass::CharClass;
//! use lexforge_core::pattern::{ClassSpec, Pattern};
//! use lexforge_macros::token_patterns;
//!
//! token_patterns! {
//!     calc_tokens = {
//!         #[skip]
//!         Whitespace => Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Whitespace))),
//!         Number => Pattern::one_or_more(&Pattern::Class(ClassSpec::Exact(CharClass::Digit))),
//!         Plus => Pattern::Literal(b"+"),
//!     }
//! }
//!
//! // calc_tokens::PATTERNS, calc_tokens::SKIP, calc_tokens::NUMBER, ...
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod token_patterns;

/// Generates a module of token-id constants and a static `NamedPattern`
/// table from a list of `Name => pattern_expr` entries.
///
/// Each entry's numeric id is assigned by its position in the list, starting
/// at 0. An entry prefixed `#[skip]` is added to the generated `SKIP` array,
/// for callers that filter skip-listed token ids out of the emitted stream
/// (the role `MemTokenStream::skip_aware` plays for whitespace).
#[proc_macro]
pub fn token_patterns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as token_patterns::TokenPatternsInput);
    token_patterns::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
