use std::fmt;

use miette::Diagnostic;
use prost::DecodeError;
use prost_reflect::DescriptorError;
use thiserror::Error;

/// An error that aborts a generation run.
///
/// No output is returned for a run that fails: either every requested file is generated,
/// or an error is returned.
#[derive(Diagnostic, Error)]
#[error(transparent)]
#[diagnostic(transparent)]
pub struct Error {
    kind: Box<ErrorKind>,
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum ErrorKind {
    #[error("only fully qualified names are supported: '{name}'")]
    #[diagnostic(help("type references must start with '.'"))]
    UnqualifiedReference { name: String },
    #[error("invalid generator parameter '{param}'")]
    #[diagnostic(help("supported parameters are 'multifile', 'multifile=<bool>' and 'suffix=<ext>'"))]
    InvalidParameter { param: String },
    #[error("file '{name}' was requested but not provided")]
    FileNotFound { name: String },
    #[error("failed to decode {what}")]
    Decode {
        what: &'static str,
        #[source]
        err: DecodeError,
    },
    #[error("{}", err)]
    #[diagnostic(forward(err))]
    Descriptor { err: DescriptorError },
}

impl Error {
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }

    pub(crate) fn unqualified_reference(name: &str) -> Self {
        Error::from_kind(ErrorKind::UnqualifiedReference {
            name: name.to_owned(),
        })
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns true if this error was caused by a type reference that does not start with `.`.
    pub fn is_unqualified_reference(&self) -> bool {
        matches!(&*self.kind, ErrorKind::UnqualifiedReference { .. })
    }

    /// Returns true if this error was caused by malformed input bytes or descriptors.
    pub fn is_decode(&self) -> bool {
        matches!(
            &*self.kind,
            ErrorKind::Decode { .. } | ErrorKind::Descriptor { .. }
        )
    }
}

impl From<DescriptorError> for Error {
    fn from(err: DescriptorError) -> Self {
        Error::from_kind(ErrorKind::Descriptor { err })
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            ErrorKind::Decode { err, .. } => write!(f, "{}: {}", self, err),
            ErrorKind::Descriptor { err } => err.fmt(f),
            ErrorKind::UnqualifiedReference { .. }
            | ErrorKind::InvalidParameter { .. }
            | ErrorKind::FileNotFound { .. } => write!(f, "{}", self),
        }
    }
}

/// A problem found while generating code that does not stop generation.
///
/// Warnings are returned alongside the generated files in [`Output`](crate::Output).
#[derive(Debug, Clone, PartialEq, Eq, Diagnostic, Error)]
#[non_exhaustive]
pub enum Warning {
    /// A type reference whose package is not known to the [`NamespaceTable`](crate::NamespaceTable).
    ///
    /// The reference is still converted to a namespace on a best-effort basis.
    #[error("non tracked package name found '{name}'")]
    #[diagnostic(
        severity(Warning),
        help("include the file declaring this package in the same invocation so its namespace is known")
    )]
    UntrackedPackage {
        /// The referenced name, without the leading `.`.
        name: String,
    },
}

#[test]
fn fmt_debug_decode() {
    let err = Error::from_kind(ErrorKind::Decode {
        what: "code generator request",
        err: DecodeError::new("buffer underflow"),
    });

    assert!(err.is_decode());
    assert_eq!(
        format!("{:?}", err),
        "failed to decode code generator request: failed to decode Protobuf message: buffer underflow"
    );
}

#[test]
fn fmt_debug_unqualified() {
    let err = Error::unqualified_reference("foo.Bar");

    assert!(err.is_unqualified_reference());
    assert!(!err.is_decode());
    assert_eq!(
        format!("{:?}", err),
        "only fully qualified names are supported: 'foo.Bar'"
    );
}
