//! Error types for specification loading and resolution.

use thiserror::Error;

/// A structural schema violation reported by a [`SchemaValidator`].
///
/// Carries the document location that failed and a human-readable reason.
/// Schema validation runs before any model element is constructed, so a
/// violation always aborts the load with no partial model exposed.
///
/// [`SchemaValidator`]: crate::validate::SchemaValidator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{at}: {message}")]
pub struct SchemaViolation {
    /// Document path of the offending node (e.g. `operations.list[3]`).
    pub at: String,
    /// What was wrong with it.
    pub message: String,
}

impl SchemaViolation {
    /// Creates a violation report for the given document path.
    pub fn new(at: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            at: at.into(),
            message: message.into(),
        }
    }
}

/// A dependency that was not available *yet* when an element tried to
/// resolve.
///
/// Deferred references are recoverable: the engine re-enqueues the element
/// and retries it on the next pass. They only become visible to the caller
/// when resolution stalls, in which case the most recent deferral is surfaced
/// as the likely root cause inside [`SpecError::ResolutionStalled`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeferredRef {
    /// An attribute set referenced by name is not (yet) in the family.
    #[error("attribute set '{0}' is not known")]
    AttrSet(String),

    /// An operation referenced by name is not (yet) in the family.
    #[error("operation '{0}' is not known")]
    Operation(String),

    /// A notification borrows its payload shape from an operation that does
    /// not declare an attribute set.
    #[error("operation '{0}' declares no attribute set to borrow")]
    NotifyPayload(String),
}

/// Error during specification loading.
///
/// Every variant is fatal: the family is either fully resolved or not
/// produced at all.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("failed to read specification: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse specification document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("schema validation failed: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("{kind} entry is missing its 'name'")]
    MissingName { kind: &'static str },

    #[error("field '{field}' is not {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("duplicate attribute set '{0}'")]
    DuplicateAttrSet(String),

    #[error("duplicate attribute '{name}' in set '{set}'")]
    DuplicateAttr { set: String, name: String },

    #[error("attribute value {value} assigned twice in set '{set}'")]
    DuplicateAttrValue { set: String, value: u32 },

    #[error("duplicate operation '{0}'")]
    DuplicateOperation(String),

    #[error("unknown enum model '{0}' (expected 'unified' or 'directional')")]
    UnknownEnumModel(String),

    #[error("cannot classify operation '{0}' as a call, notification, or reserved entry")]
    CannotClassify(String),

    #[error("cannot determine attribute set for operation '{0}'")]
    NoAttrSet(String),

    #[error("derived numeric id overflows u32 after '{after}'")]
    IdOverflow { after: String },

    #[error("element '{0}' visited again after it was fully resolved")]
    ElementRevisited(String),

    #[error("internal: pending queue names unknown element '{0}'")]
    UnknownElement(String),

    #[error(
        "resolution stalled with {pending} unresolved element(s); last deferral: {}",
        .last.as_ref().map_or_else(|| String::from("none recorded"), ToString::to_string)
    )]
    ResolutionStalled {
        /// How many elements were still pending when no pass made progress.
        pending: usize,
        /// The most recently observed deferral, the likely root cause.
        last: Option<DeferredRef>,
    },
}

/// Outcome of a single element resolution step.
///
/// Distinguishes "the dependency does not exist yet" (retry next pass) from
/// "the specification is defective" (abort the load).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Deferred(#[from] DeferredRef),

    #[error(transparent)]
    Fatal(#[from] SpecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_ref_messages() {
        assert_eq!(
            DeferredRef::AttrSet("link-attrs".into()).to_string(),
            "attribute set 'link-attrs' is not known"
        );
        assert_eq!(
            DeferredRef::Operation("link-get".into()).to_string(),
            "operation 'link-get' is not known"
        );
    }

    #[test]
    fn test_stalled_message_with_and_without_deferral() {
        let with = SpecError::ResolutionStalled {
            pending: 2,
            last: Some(DeferredRef::AttrSet("missing".into())),
        };
        assert_eq!(
            with.to_string(),
            "resolution stalled with 2 unresolved element(s); last deferral: \
             attribute set 'missing' is not known"
        );

        let without = SpecError::ResolutionStalled {
            pending: 1,
            last: None,
        };
        assert!(without.to_string().ends_with("none recorded"));
    }

    #[test]
    fn test_schema_violation_display() {
        let v = SchemaViolation::new("attribute-sets[0]", "missing 'name'");
        assert_eq!(v.to_string(), "attribute-sets[0]: missing 'name'");
    }
}
