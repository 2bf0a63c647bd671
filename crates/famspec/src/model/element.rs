//! Common behavior shared by every specification element.
//!
//! Elements of the specification may refer to each other by name, in any
//! declaration order, so parts of their initialization that need access to
//! sibling elements are split out into a resolution step driven by the
//! engine in [`crate::resolve`]. The lifecycle state is an explicit enum so
//! that the "superclass resolved at most once" contract is enforced and an
//! illegal visit to an already-resolved element is detectable rather than
//! silently re-run.

use crate::error::SpecError;
use crate::node::Node;

/// Resolution lifecycle of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveState {
    /// Constructed, no resolution step has run.
    Unresolved,
    /// The base-level step ran; the element's own step may still defer.
    SuperResolved,
    /// Fully resolved; the engine never visits it again.
    Resolved,
}

/// State every specification element carries: its raw document node, its
/// declared name (optional), an identifier-safe variant of that name, and
/// the resolution lifecycle state.
#[derive(Debug, Clone)]
pub(crate) struct ElementCore {
    raw: Node,
    name: Option<String>,
    ident_name: Option<String>,
    state: ResolveState,
}

impl ElementCore {
    /// Builds the element base from its declaration node, capturing the
    /// `name` field when declared.
    pub fn from_node(raw: Node) -> Self {
        let name = raw.get_str("name").map(str::to_owned);
        let ident_name = name.as_deref().map(identifier_name);
        Self {
            raw,
            name,
            ident_name,
            state: ResolveState::Unresolved,
        }
    }

    pub fn raw(&self) -> &Node {
        &self.raw
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ident_name(&self) -> Option<&str> {
        self.ident_name.as_deref()
    }

    /// Returns the declared name, or fails for element kinds that require
    /// one.
    pub fn require_name(&self, kind: &'static str) -> Result<String, SpecError> {
        self.name
            .clone()
            .ok_or(SpecError::MissingName { kind })
    }

    /// Runs the base-level resolution step at most once.
    ///
    /// The base step itself has no work beyond the state transition; calling
    /// this again while the element's own step is still deferring is fine,
    /// but visiting a fully resolved element is an engine defect.
    pub fn begin_resolve(&mut self) -> Result<(), SpecError> {
        match self.state {
            ResolveState::Unresolved => {
                self.state = ResolveState::SuperResolved;
                Ok(())
            }
            ResolveState::SuperResolved => Ok(()),
            ResolveState::Resolved => Err(SpecError::ElementRevisited(
                self.name.clone().unwrap_or_else(|| String::from("<root>")),
            )),
        }
    }

    /// Marks the element fully resolved.
    pub fn finish_resolve(&mut self) {
        self.state = ResolveState::Resolved;
    }

    #[cfg(test)]
    pub fn state(&self) -> ResolveState {
        self.state
    }
}

/// Normalizes a declared name into something safe to use as a programming
/// identifier: separator characters become underscores.
pub(crate) fn identifier_name(name: &str) -> String {
    name.replace(['-', '.'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(doc: &str) -> ElementCore {
        ElementCore::from_node(Node::new(serde_yaml::from_str(doc).unwrap()))
    }

    #[test]
    fn test_name_capture() {
        let c = core("name: link-get");
        assert_eq!(c.name(), Some("link-get"));
        assert_eq!(c.ident_name(), Some("link_get"));
    }

    #[test]
    fn test_unnamed_element() {
        let c = core("value: 3");
        assert_eq!(c.name(), None);
        assert_eq!(c.ident_name(), None);
        assert!(c.require_name("attribute").is_err());
    }

    #[test]
    fn test_identifier_name_normalization() {
        assert_eq!(identifier_name("foo-bar"), "foo_bar");
        assert_eq!(identifier_name("foo.bar-baz"), "foo_bar_baz");
        assert_eq!(identifier_name("plain"), "plain");
    }

    #[test]
    fn test_resolve_lifecycle() {
        let mut c = core("name: x");
        assert_eq!(c.state(), ResolveState::Unresolved);

        c.begin_resolve().unwrap();
        assert_eq!(c.state(), ResolveState::SuperResolved);

        // Re-entry while still unresolved at the subclass level is fine.
        c.begin_resolve().unwrap();
        assert_eq!(c.state(), ResolveState::SuperResolved);

        c.finish_resolve();
        assert_eq!(c.state(), ResolveState::Resolved);
    }

    #[test]
    fn test_revisit_after_resolved_is_detected() {
        let mut c = core("name: x");
        c.begin_resolve().unwrap();
        c.finish_resolve();

        let err = c.begin_resolve().unwrap_err();
        assert!(matches!(err, SpecError::ElementRevisited(name) if name == "x"));
    }
}
