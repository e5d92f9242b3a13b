//! Errors surfaced by the composite decoder.

use core::fmt;

use alloc::{boxed::Box, vec::Vec};
use thiserror::Error;

use crate::{cursor, rule};

/// A failure reported by a validation or custom decoding hook.
pub type Cause = Box<dyn core::error::Error + Send + Sync>;

/// The dotted path to a field, outermost composite first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<&'static str>);

impl FieldPath {
    /// The path's field names, outermost first.
    pub fn segments(&self) -> &[&'static str] {
        &self.0
    }

    fn prepend(&mut self, name: &'static str) {
        self.0.insert(0, name);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(".")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Errors occurring while decoding a composite.
///
/// All variants except [`Error::TrailingData`] are attributed to the field
/// being decoded when they occurred.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a scalar field from the stream failed, typically because too
    /// few bits remained.
    #[error("Field `{path}`: {source}")]
    Stream {
        path: FieldPath,
        source: cursor::Error,
    },
    /// A field's annotation could not be parsed.
    #[error("Field `{path}`: {source}")]
    Rule { path: FieldPath, source: rule::Error },
    /// A field requested validation, but its type has no validation hook.
    #[error("Field `{path}` requests validation, but its type has no validation hook.")]
    MissingValidator { path: FieldPath },
    /// A field's validation hook rejected its decoded value.
    #[error("Field `{path}` failed validation: {cause}")]
    ValidationFailed {
        path: FieldPath,
        #[source]
        cause: Cause,
    },
    /// A field's custom decoder failed.
    #[error("Field `{path}` failed custom decoding: {cause}")]
    CustomDecodeFailed {
        path: FieldPath,
        #[source]
        cause: Cause,
    },
    /// Bits remained after a strict decode.
    #[error("{0} bits remaining in buffer after decode")]
    TrailingData(usize),
}

impl Error {
    /// The path of the field this error is attributed to, if any.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::Stream { path, .. }
            | Self::Rule { path, .. }
            | Self::MissingValidator { path }
            | Self::ValidationFailed { path, .. }
            | Self::CustomDecodeFailed { path, .. } => Some(path),
            Self::TrailingData(_) => None,
        }
    }

    /// Whether decoding ran out of input bits.
    pub fn is_out_of_data(&self) -> bool {
        matches!(
            self,
            Self::Stream {
                source: cursor::Error::OutOfData { .. },
                ..
            }
        )
    }

    /// Whether the error stems from the schema itself rather than the data.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Rule { .. } | Self::MissingValidator { .. })
    }

    /// Attribute the error to an enclosing field.
    pub(crate) fn within(mut self, name: &'static str) -> Self {
        match &mut self {
            Self::Stream { path, .. }
            | Self::Rule { path, .. }
            | Self::MissingValidator { path }
            | Self::ValidationFailed { path, .. }
            | Self::CustomDecodeFailed { path, .. } => path.prepend(name),
            Self::TrailingData(_) => {}
        }
        self
    }
}
