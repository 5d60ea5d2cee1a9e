use crate::kind::Kind;
use thiserror::Error;

/// Errors that can occur when reading from a `MetadataStore` or one of its views
///
/// Only the `get` family of operations fails. Lookups like `get_or_null`,
/// `exists` and `remove` report absence through their return value instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// No submap owns the identifier (or its slot holds null)
    #[error("Unknown metadata identifier: {0}")]
    UnknownIdentifier(String),
    /// The typed view queried has no usable slot for the identifier
    ///
    /// This is raised both for identifiers that are genuinely absent and for
    /// identifiers owned by a different kind, since a typed view only ever sees
    /// its own storage.
    #[error("Unknown metadata identifier '{identifier}' for type {kind}{}", nullable_marker(.nullable))]
    UnknownTypedIdentifier {
        identifier: String,
        kind: Kind,
        nullable: bool,
    },
}

fn nullable_marker(nullable: &bool) -> &'static str {
    if *nullable {
        "?"
    } else {
        ""
    }
}

impl MetadataError {
    pub(crate) fn untyped(identifier: &str) -> Self {
        MetadataError::UnknownIdentifier(identifier.to_owned())
    }

    pub(crate) fn typed(identifier: &str, kind: Kind, nullable: bool) -> Self {
        MetadataError::UnknownTypedIdentifier {
            identifier: identifier.to_owned(),
            kind,
            nullable,
        }
    }

    /// The identifier that could not be resolved
    pub fn identifier(&self) -> &str {
        match self {
            MetadataError::UnknownIdentifier(identifier) => identifier,
            MetadataError::UnknownTypedIdentifier { identifier, .. } => identifier,
        }
    }

    /// The kind of the view that raised the error, if it was a typed one
    pub fn kind(&self) -> Option<Kind> {
        match self {
            MetadataError::UnknownIdentifier(_) => None,
            MetadataError::UnknownTypedIdentifier { kind, .. } => Some(*kind),
        }
    }

    /// Whether the nullable flavor of a view raised the error
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            MetadataError::UnknownTypedIdentifier { nullable: true, .. }
        )
    }
}
