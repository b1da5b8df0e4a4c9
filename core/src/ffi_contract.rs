//! The FFI binding surface's *vocabulary*: the numeric codes a C
//! binding would marshal across the boundary, expressed here as plain Rust
//! enums with no `unsafe` and no `extern "C"`. Building the actual binding
//! (exported functions, opaque handles, `catch_unwind` wrapping) is out of
//! scope — this module exists so a future binding crate has one place to
//! import stable numeric assignments from instead of inventing its own.

/// Mirrors the result codes a binding would return from each exported
/// function: `0` for success, small positive integers for each distinct
/// failure category a caller across the boundary needs to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Ok = 0,
    Unknown = 1,
    Oom = 2,
    Io = 3,
    Eof = 4,
    InvalidHandle = 5,
    InvalidArgument = 6,
    InvalidState = 7,
    UnexpectedToken = 8,
    ParserConfig = 9,
    NotImplemented = 10,
}

impl From<&crate::error::Error> for ResultCode {
    fn from(err: &crate::error::Error) -> Self {
        match err {
            crate::error::Error::Buffer(_) => ResultCode::Oom,
            crate::error::Error::Pattern(_) => ResultCode::ParserConfig,
            crate::error::Error::Arena(_) => ResultCode::Oom,
            crate::error::Error::Tokenize(_) => ResultCode::Io,
            crate::error::Error::Fsm(_) => ResultCode::UnexpectedToken,
            crate::error::Error::Parse(_) => ResultCode::Unknown,
        }
    }
}

/// Mirrors [`crate::events::Event`]'s discriminant, for a binding that
/// dispatches on an integer tag instead of a Rust enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum EventTypeId {
    StartDocument = 1,
    EndDocument = 2,
    StartElement = 3,
    EndElement = 4,
    Value = 5,
    Error = 6,
}

impl From<&crate::events::Event<'_>> for EventTypeId {
    fn from(event: &crate::events::Event<'_>) -> Self {
        match event {
            crate::events::Event::StartDocument => EventTypeId::StartDocument,
            crate::events::Event::EndDocument => EventTypeId::EndDocument,
            crate::events::Event::StartElement { .. } => EventTypeId::StartElement,
            crate::events::Event::EndElement { .. } => EventTypeId::EndElement,
            crate::events::Event::Value { .. } => EventTypeId::Value,
            crate::events::Event::Error { .. } => EventTypeId::Error,
        }
    }
}
