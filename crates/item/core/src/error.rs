//! Shared error classification for item-core.
//!
//! Each layer owns its error enum (`BitError`, `CodecError`, `ItemError`,
//! `PlacementError`, `OracleError`); all of them implement [`EngineError`] so
//! callers can sort failures without matching on every variant.
//!
//! Three outcomes matter to an editor:
//!
//! - a record that cannot be decoded is corrupt, together with its block;
//! - a refused mutation or placement leaves every piece of state untouched;
//! - setting a value that is already stored succeeds with
//!   [`Mutation::Unchanged`].

/// How a caller should react to a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request may succeed with other arguments, e.g. a different
    /// destination cell or another socket filler.
    Recoverable,

    /// The request itself is invalid: unknown handle, unencodable name,
    /// out-of-range quantity.
    Validation,

    /// Engine state disagrees with itself (index desync, write past the end of
    /// a record buffer). Indicates a bug.
    Internal,

    /// Stored bytes are corrupt; nothing decoded from the block can be used.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Corruption or a bug rather than a bad request.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

impl core::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every error enum of the crate.
pub trait EngineError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the variant, e.g. `"CODEC_TRUNCATED"`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Result of a mutation that was accepted.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// Bits were rewritten.
    Changed,
    /// The record already held the requested value; nothing was written.
    Unchanged,
}

impl Mutation {
    pub const fn is_changed(self) -> bool {
        matches!(self, Self::Changed)
    }
}
