//! The one error type every stage of the pipeline reports through.
//!
//! Messages name the offending section, field and value so callers can
//! surface them verbatim. A parse either returns a fully valid
//! [`Manifest`](crate::Manifest) or one of these; there is no partial model.

/// Any failure while tokenizing, validating or building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("field '{field}' appears before any section header")]
    OrphanOption { field: String },
    #[error("invalid spaces in '[{section}]'")]
    SectionSpaces { section: String },
    #[error("invalid descriptor '[{section}]'")]
    UnknownSection { section: String },
    #[error("duplicated field '{field}' in '[{section}]'")]
    DuplicateField { field: String, section: String },
    #[error("missing field '{field}' in '[{section}]'")]
    MissingField { field: String, section: String },
    #[error("invalid value '{value}' for field '{field}' in '[{section}]': {reason}")]
    InvalidValue {
        value: String,
        field: String,
        section: String,
        reason: String,
    },
    #[error("string '{value}' for field '{field}' in '[{section}]' is too long (maximum is {max})")]
    StringTooLong {
        value: String,
        field: String,
        section: String,
        max: usize,
    },
    #[error("array '{value}' for field '{field}' in '[{section}]' does not start with < or end with >")]
    MalformedArray {
        value: String,
        field: String,
        section: String,
    },
    #[error("missing id value in '[{section}]'")]
    MissingId { section: String },
    #[error("invalid id value in '[{section}]': {reason}")]
    InvalidId { section: String, reason: String },
    #[error("invalid id for '[{section}]' (cannot be 0)")]
    ZeroId { section: String },
    #[error("duplicated 'id' for descriptors '[{section}]' and '[{previous}]'")]
    DuplicateId { section: String, previous: String },
    #[error("multiple instances of '[{section}]'")]
    MultipleInstances { section: String },
    #[error("multiple references to '[{section}]'")]
    MultipleReferences { section: String },
    #[error("invalid '[manifest-header]' format version '{major}.{minor}' (only supports '{supported_major}.{supported_minor}')")]
    VersionMismatch {
        major: u8,
        minor: u8,
        supported_major: u8,
        supported_minor: u8,
    },
    #[error("invalid class for '[{section}]' (should be a 'Control' bundle)")]
    ControlBundleClass { section: String },
    #[error("invalid protocol for '[{section}]' (should be a 'Control' CPort)")]
    ControlCPortProtocol { section: String },
    #[error("missing '[{section}]' section")]
    MissingSection { section: &'static str },
}
