//! Error taxonomy for the bundle-to-APK pipeline.
//!
//! Two families, mirroring who is at fault:
//!
//! - [`UserError`]: the input bundle, device spec, or command configuration is
//!   wrong. Carries a stable [`UserErrorKind`] plus structured fields
//!   (offending module, path) so a caller can serialize the failure for
//!   machine consumption.
//! - [`InternalError`]: a bug or environment failure (I/O, inconsistent
//!   in-memory state, unsupported bundle version).
//!
//! Errors abort the enclosing command; there are no local retries.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error kinds for user-caused failures.
///
/// The string form (see [`UserErrorKind::as_str`]) is part of the output
/// contract and never changes for an existing variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UserErrorKind {
    InvalidBundle,
    InvalidCommand,
    ResourceTableMissingFile,
    ResourceTableUnknownReference,
    FileTypeInvalidDirectory,
    FileTypeUnknownTargetingKey,
    FileTypeInvalidTargetingValue,
    InvalidVersionCode,
    TextureCompressionParity,
    InvalidApexConfig,
    DeviceNotFound,
    TooManyDevices,
}

impl UserErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidBundle => "INVALID_BUNDLE",
            Self::InvalidCommand => "INVALID_COMMAND",
            Self::ResourceTableMissingFile => "RESOURCE_TABLE_MISSING_FILE",
            Self::ResourceTableUnknownReference => "RESOURCE_TABLE_UNKNOWN_REFERENCE",
            Self::FileTypeInvalidDirectory => "FILE_TYPE_INVALID_DIRECTORY",
            Self::FileTypeUnknownTargetingKey => "FILE_TYPE_UNKNOWN_TARGETING_KEY",
            Self::FileTypeInvalidTargetingValue => "FILE_TYPE_INVALID_TARGETING_VALUE",
            Self::InvalidVersionCode => "INVALID_VERSION_CODE",
            Self::TextureCompressionParity => "TEXTURE_COMPRESSION_PARITY",
            Self::InvalidApexConfig => "INVALID_APEX_CONFIG",
            Self::DeviceNotFound => "DEVICE_NOT_FOUND",
            Self::TooManyDevices => "TOO_MANY_DEVICES",
        }
    }
}

impl AsRef<str> for UserErrorKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserErrorKind {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A failure caused by the tool's input: bundle contents, device spec, or
/// command configuration.
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct UserError {
    pub kind: UserErrorKind,
    pub message: String,
    /// Offending module name, when the failure is scoped to one module.
    pub module: Option<String>,
    /// Offending entry path, when the failure is scoped to one entry.
    pub path: Option<String>,
}

impl UserError {
    pub fn new(kind: UserErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            module: None,
            path: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Machine-readable record of this error, suitable for persisting
    /// alongside human-readable output.
    pub fn to_record(&self) -> UserErrorRecord {
        UserErrorRecord {
            kind: self.kind,
            message: self.message.clone(),
            module: self.module.clone(),
            path: self.path.clone(),
        }
    }
}

/// Serializable form of a [`UserError`].
#[derive(Debug, Clone, Serialize)]
pub struct UserErrorRecord {
    #[serde(rename = "error_kind")]
    pub kind: UserErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A bug or environment failure that is not attributable to the input.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("inconsistent state: {0}")]
    State(String),

    #[error("unsupported bundle version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl Error {
    /// Shorthand for an [`UserErrorKind::InvalidBundle`] failure.
    pub fn invalid_bundle(message: impl Into<String>) -> Self {
        UserError::new(UserErrorKind::InvalidBundle, message).into()
    }

    /// Shorthand for an [`UserErrorKind::InvalidCommand`] failure.
    pub fn invalid_command(message: impl Into<String>) -> Self {
        UserError::new(UserErrorKind::InvalidCommand, message).into()
    }

    /// Shorthand for an inconsistent-state internal failure.
    pub fn internal(message: impl Into<String>) -> Self {
        InternalError::State(message.into()).into()
    }

    /// The stable kind if this is a user error.
    pub fn user_kind(&self) -> Option<UserErrorKind> {
        match self {
            Self::User(e) => Some(e.kind),
            Self::Internal(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(InternalError::Io(err))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Internal(InternalError::Zip(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(UserErrorKind::InvalidBundle.as_str(), "INVALID_BUNDLE");
        assert_eq!(
            UserErrorKind::TextureCompressionParity.as_str(),
            "TEXTURE_COMPRESSION_PARITY"
        );
        assert_eq!(
            UserErrorKind::ResourceTableMissingFile.as_str(),
            "RESOURCE_TABLE_MISSING_FILE"
        );
    }

    #[test]
    fn user_error_record_serializes_structured_fields() {
        let err = UserError::new(UserErrorKind::ResourceTableMissingFile, "missing file")
            .with_module("base")
            .with_path("res/drawable/icon.png");
        let json = serde_json::to_value(err.to_record()).unwrap();
        assert_eq!(json["error_kind"], "RESOURCE_TABLE_MISSING_FILE");
        assert_eq!(json["module"], "base");
        assert_eq!(json["path"], "res/drawable/icon.png");
    }

    #[test]
    fn user_kind_is_none_for_internal_errors() {
        let err = Error::internal("duplicate master split");
        assert!(err.user_kind().is_none());

        let err = Error::invalid_bundle("no BundleConfig.pb");
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }
}
