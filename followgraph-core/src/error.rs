//! Error types for the followgraph core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring a generator or building a roster.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// A configuration value fell outside its documented range.
    #[error("parameter `{name}` rejected value {value}: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Value supplied by the caller.
        value: f64,
        /// Human-readable explanation of the accepted range.
        reason: &'static str,
    },
    /// The roster contained no personas.
    #[error("roster `{roster}` contains no personas")]
    EmptyRoster {
        /// Identifier for the empty roster.
        roster: Arc<str>,
    },
    /// Two roster rows shared the same handle.
    #[error("handle `{handle}` appears on rows {first} and {second}")]
    DuplicateHandle {
        /// The repeated handle.
        handle: String,
        /// Zero-based row of the first occurrence.
        first: usize,
        /// Zero-based row of the repeated occurrence.
        second: usize,
    },
    /// A roster row supplied a blank handle.
    #[error("row {row} has an empty handle")]
    EmptyHandle {
        /// Zero-based row index.
        row: usize,
    },
    /// A handle did not resolve to any persona in the registry.
    #[error("no persona is registered under handle `{handle}`")]
    UnknownPersona {
        /// Handle that failed to resolve.
        handle: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A configuration value fell outside its documented range.
        InvalidParameter => InvalidParameter { .. } => "FOLLOWGRAPH_INVALID_PARAMETER",
        /// The roster contained no personas.
        EmptyRoster => EmptyRoster { .. } => "FOLLOWGRAPH_EMPTY_ROSTER",
        /// Two roster rows shared the same handle.
        DuplicateHandle => DuplicateHandle { .. } => "FOLLOWGRAPH_DUPLICATE_HANDLE",
        /// A roster row supplied a blank handle.
        EmptyHandle => EmptyHandle { .. } => "FOLLOWGRAPH_EMPTY_HANDLE",
        /// A handle did not resolve to any persona in the registry.
        UnknownPersona => UnknownPersona { .. } => "FOLLOWGRAPH_UNKNOWN_PERSONA",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GraphError>;
