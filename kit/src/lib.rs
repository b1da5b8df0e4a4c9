#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
//! Facade crate: re-exports [`lexforge_core`] and [`lexforge_macros`] under
//! one name for consumers who don't need the workspace split.

pub use lexforge_core::*;
pub use lexforge_macros::*;
