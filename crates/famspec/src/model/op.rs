//! Operation model: named message definitions and their classification.

use crate::error::SpecError;
use crate::model::element::ElementCore;
use crate::node::Node;

/// How an operation entry is classified.
///
/// Exactly one classification applies to every operation. A notification
/// declaration (`notify`/`event`) takes precedence over a call declaration
/// (`do`/`dump`); an entry declaring neither is a reserved placeholder id
/// with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Declares a synchronous request (`do` and/or `dump`).
    Call,
    /// Declares an asynchronous notification or event.
    Notification,
    /// Reserves an identifier without defining a message.
    Reserved,
}

/// A named message definition within a family.
///
/// The request/response numeric identifiers are computed during family
/// construction under the family's enumeration policy; the payload attribute
/// set is filled in later by the resolution engine, since it may name
/// elements declared anywhere in the document.
#[derive(Debug, Clone)]
pub struct Operation {
    core: ElementCore,
    name: String,
    value: Option<u32>,
    req_value: Option<u32>,
    rsp_value: Option<u32>,
    kind: OpKind,
    attr_set: Option<String>,
}

impl Operation {
    pub(crate) fn new(
        raw: Node,
        req_value: Option<u32>,
        rsp_value: Option<u32>,
    ) -> Result<Self, SpecError> {
        let core = ElementCore::from_node(raw);
        let name = core.require_name("operation")?;

        let kind = if core.raw().contains("notify") || core.raw().contains("event") {
            OpKind::Notification
        } else if core.raw().contains("do") || core.raw().contains("dump") {
            OpKind::Call
        } else {
            OpKind::Reserved
        };

        let value = match (req_value, rsp_value) {
            (Some(req), Some(rsp)) if req == rsp => Some(req),
            _ => None,
        };

        Ok(Self {
            core,
            name,
            value,
            req_value,
            rsp_value,
            kind,
            attr_set: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name normalized for use as a programming identifier.
    pub fn ident_name(&self) -> &str {
        self.core.ident_name().unwrap_or(&self.name)
    }

    /// Combined numeric identifier, present only when the request and
    /// response identifiers are both present and equal.
    pub fn value(&self) -> Option<u32> {
        self.value
    }

    /// Numeric identifier of the request direction, absent for pure
    /// notifications.
    pub fn req_value(&self) -> Option<u32> {
        self.req_value
    }

    /// Numeric identifier of the response direction, absent for calls that
    /// declare no reply.
    pub fn rsp_value(&self) -> Option<u32> {
        self.rsp_value
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn is_call(&self) -> bool {
        self.kind == OpKind::Call
    }

    pub fn is_async(&self) -> bool {
        self.kind == OpKind::Notification
    }

    pub fn is_resv(&self) -> bool {
        self.kind == OpKind::Reserved
    }

    /// Name of the resolved payload attribute set.
    ///
    /// `None` until resolution runs, and permanently `None` for reserved
    /// operations. Use [`Family::op_attr_set`] to turn it into the set
    /// itself.
    ///
    /// [`Family::op_attr_set`]: crate::model::Family::op_attr_set
    pub fn attr_set(&self) -> Option<&str> {
        self.attr_set.as_deref()
    }

    pub(crate) fn raw(&self) -> &Node {
        self.core.raw()
    }

    pub(crate) fn set_attr_set(&mut self, attr_set: Option<String>) {
        self.attr_set = attr_set;
    }

    pub(crate) fn begin_resolve(&mut self) -> Result<(), SpecError> {
        self.core.begin_resolve()
    }

    pub(crate) fn finish_resolve(&mut self) {
        self.core.finish_resolve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(doc: &str, req: Option<u32>, rsp: Option<u32>) -> Operation {
        Operation::new(Node::new(serde_yaml::from_str(doc).unwrap()), req, rsp).unwrap()
    }

    #[test]
    fn test_call_classification() {
        let o = op("name: link-get\ndo:\n  request:\n", Some(0), Some(0));
        assert_eq!(o.kind(), OpKind::Call);
        assert!(o.is_call());
        assert!(!o.is_async());
        assert!(!o.is_resv());

        let o = op("name: link-dump\ndump:\n  reply:\n", Some(1), Some(1));
        assert!(o.is_call());
    }

    #[test]
    fn test_notification_classification() {
        let o = op("name: link-ntf\nnotify: link-get\n", None, Some(2));
        assert_eq!(o.kind(), OpKind::Notification);

        let o = op("name: link-evt\nevent:\n", Some(3), Some(3));
        assert_eq!(o.kind(), OpKind::Notification);
    }

    #[test]
    fn test_reserved_classification() {
        let o = op("name: old-op\n", Some(4), Some(4));
        assert!(o.is_resv());
        assert_eq!(o.attr_set(), None);
    }

    #[test]
    fn test_notification_takes_precedence_over_call() {
        let o = op("name: odd\ndo:\n  request:\nnotify: other\n", None, Some(0));
        assert_eq!(o.kind(), OpKind::Notification);
    }

    #[test]
    fn test_combined_value() {
        assert_eq!(op("name: a\n", Some(3), Some(3)).value(), Some(3));
        assert_eq!(op("name: a\n", Some(3), Some(4)).value(), None);
        assert_eq!(op("name: a\n", Some(3), None).value(), None);
        assert_eq!(op("name: a\n", None, Some(3)).value(), None);
    }

    #[test]
    fn test_missing_name_rejected() {
        let err =
            Operation::new(Node::new(serde_yaml::from_str("do:\n").unwrap()), None, None)
                .unwrap_err();
        assert!(matches!(err, SpecError::MissingName { kind } if kind == "operation"));
    }

    #[test]
    fn test_ident_name() {
        let o = op("name: link-set-ntf\nnotify: link-set\n", None, Some(0));
        assert_eq!(o.ident_name(), "link_set_ntf");
    }
}
