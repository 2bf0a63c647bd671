//! Iterative fixed-point resolution of specification elements.
//!
//! Elements of a specification may refer to each other by name in any
//! declaration order, so instead of demanding a topologically sorted
//! document the loader queues every element at construction time and
//! repeatedly sweeps the queue. An element whose dependencies are all
//! available resolves and is dropped; one that is missing a dependency
//! defers and is retried on the next pass. A full pass that resolves
//! nothing while elements remain pending means the references can never be
//! satisfied, and the load fails with the most recent deferral as the
//! diagnostic.
//!
//! Each pass that makes progress permanently removes at least one element,
//! so total work is bounded by the number of elements times the depth of
//! the longest dependency chain.

use log::debug;

use crate::error::{DeferredRef, ResolveError, SpecError};
use crate::model::family::Family;

/// Key of one pending element in the work queue.
///
/// The family is addressed by a dedicated variant rather than by name: the
/// root is unique, registers itself exactly once, and resolves before the
/// elements it constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ElemRef {
    Family,
    AttrSet(String),
    Attr { set: String, name: String },
    Op(String),
}

impl std::fmt::Display for ElemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElemRef::Family => write!(f, "family"),
            ElemRef::AttrSet(name) => write!(f, "attribute set '{name}'"),
            ElemRef::Attr { set, name } => write!(f, "attribute '{set}.{name}'"),
            ElemRef::Op(name) => write!(f, "operation '{name}'"),
        }
    }
}

/// Drives the family and everything it constructs to full resolution.
///
/// The queue starts with just the root; the family's own step constructs
/// the attribute sets and operations, which join the queue for the
/// following passes.
pub(crate) fn run(family: &mut Family) -> Result<(), SpecError> {
    let mut pending = vec![ElemRef::Family];
    let mut pass = 0usize;

    while !pending.is_empty() {
        pass += 1;
        let queue = std::mem::take(&mut pending);
        let total = queue.len();
        let mut progressed = 0usize;
        let mut last: Option<DeferredRef> = None;

        for elem in queue {
            match step(family, &elem, &mut pending) {
                Ok(()) => progressed += 1,
                Err(ResolveError::Deferred(reason)) => {
                    debug!("pass {pass}: {elem} deferred: {reason}");
                    last = Some(reason);
                    pending.push(elem);
                }
                Err(ResolveError::Fatal(err)) => return Err(err),
            }
        }

        debug!(
            "pass {pass}: {progressed}/{total} resolved, {} pending",
            pending.len()
        );
        if progressed == 0 {
            return Err(SpecError::ResolutionStalled {
                pending: pending.len(),
                last,
            });
        }
    }

    Ok(())
}

fn step(
    family: &mut Family,
    elem: &ElemRef,
    pending: &mut Vec<ElemRef>,
) -> Result<(), ResolveError> {
    match elem {
        ElemRef::Family => family.resolve_root(pending),
        ElemRef::AttrSet(name) => family.resolve_attr_set(name),
        ElemRef::Attr { set, name } => family.resolve_attr(set, name),
        ElemRef::Op(name) => family.resolve_operation(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Unvalidated;

    #[test]
    fn test_elem_ref_display() {
        assert_eq!(ElemRef::Family.to_string(), "family");
        assert_eq!(
            ElemRef::Attr {
                set: "link".into(),
                name: "mtu".into()
            }
            .to_string(),
            "attribute 'link.mtu'"
        );
        assert_eq!(ElemRef::Op("get".into()).to_string(), "operation 'get'");
    }

    // A genuinely unresolvable reference must terminate with a stall, not
    // loop: the pass after the one that resolves every resolvable element
    // makes no progress and aborts.
    #[test]
    fn test_unresolvable_reference_terminates() {
        let err = Family::from_yaml(
            r#"
name: demo
attribute-sets:
  - name: main
    attributes:
      - name: id
operations:
  list:
    - name: fine
      attribute-set: main
      do:
        request:
    - name: dangling
      attribute-set: missing
      do:
        request:
"#,
            &Unvalidated,
        )
        .unwrap_err();

        match err {
            SpecError::ResolutionStalled { pending, last } => {
                assert_eq!(pending, 1);
                assert_eq!(last, Some(DeferredRef::AttrSet("missing".into())));
            }
            other => panic!("expected stall, got: {other}"),
        }
    }
}
