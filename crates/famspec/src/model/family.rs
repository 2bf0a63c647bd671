//! Family: the root container describing one message-family specification.
//!
//! The family owns the whole model. It validates the raw document, builds
//! the attribute sets, enumerates the operations under the declared id
//! policy, and is itself an element driven by the resolution engine: its
//! children are only constructed once its own resolution step runs, and
//! they queue up behind it for their own steps.

use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_yaml::Value;

use crate::error::{DeferredRef, ResolveError, SpecError};
use crate::model::attr::AttrSet;
use crate::model::element::ElementCore;
use crate::model::op::{OpKind, Operation};
use crate::node::Node;
use crate::resolve::{self, ElemRef};
use crate::validate::SchemaValidator;

/// Protocol kind assumed when the document does not declare one.
pub const DEFAULT_PROTOCOL: &str = "genetlink";

/// A fully cross-referenced message-family specification.
///
/// Produced by one of the loader entry points ([`Family::from_value`],
/// [`Family::from_yaml`], [`Family::from_path`]); once a `Family` exists,
/// every cross-reference in it has been resolved and the model is
/// read-only.
#[derive(Debug)]
pub struct Family {
    core: ElementCore,
    proto: String,
    attr_sets: IndexMap<String, AttrSet>,
    msgs: IndexMap<String, Operation>,
    req_by_value: FxHashMap<u32, String>,
    rsp_by_value: FxHashMap<u32, String>,
    ops: Vec<String>,
}

impl Family {
    /// Loads a family from an already-parsed document.
    ///
    /// The validator runs first, before any element is constructed; a
    /// violation aborts the load with no partial model exposed. Resolution
    /// then runs to its fixed point.
    pub fn from_value(doc: Value, validator: &dyn SchemaValidator) -> Result<Self, SpecError> {
        validator.validate(&doc)?;

        let mut family = Self {
            core: ElementCore::from_node(Node::new(doc)),
            proto: String::from(DEFAULT_PROTOCOL),
            attr_sets: IndexMap::new(),
            msgs: IndexMap::new(),
            req_by_value: FxHashMap::default(),
            rsp_by_value: FxHashMap::default(),
            ops: Vec::new(),
        };
        resolve::run(&mut family)?;
        Ok(family)
    }

    /// Loads a family from specification text.
    pub fn from_yaml(text: &str, validator: &dyn SchemaValidator) -> Result<Self, SpecError> {
        let doc: Value = serde_yaml::from_str(text)?;
        Self::from_value(doc, validator)
    }

    /// Loads a family from a specification file.
    pub fn from_path(path: &Path, validator: &dyn SchemaValidator) -> Result<Self, SpecError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text, validator)
    }

    /// Declared family name, if any.
    pub fn name(&self) -> Option<&str> {
        self.core.name()
    }

    /// Family name normalized for use as a programming identifier.
    pub fn ident_name(&self) -> Option<&str> {
        self.core.ident_name()
    }

    /// Protocol kind (e.g. `genetlink`).
    pub fn proto(&self) -> &str {
        &self.proto
    }

    /// Looks an attribute set up by name.
    pub fn attr_set(&self, name: &str) -> Option<&AttrSet> {
        self.attr_sets.get(name)
    }

    /// All attribute sets in declaration order.
    pub fn attr_sets(&self) -> impl Iterator<Item = &AttrSet> {
        self.attr_sets.values()
    }

    /// Looks an operation up by name in the full catalog.
    pub fn op(&self, name: &str) -> Option<&Operation> {
        self.msgs.get(name)
    }

    /// The full operation catalog in declaration order, reserved
    /// placeholders included.
    pub fn msgs(&self) -> impl Iterator<Item = &Operation> {
        self.msgs.values()
    }

    /// The filtered catalog of valid requests/responses: operations that
    /// are not purely asynchronous and declare a payload attribute set.
    pub fn valid_ops(&self) -> impl Iterator<Item = &Operation> {
        self.ops.iter().filter_map(|name| self.msgs.get(name))
    }

    /// Reverse lookup from a wire-level request identifier.
    pub fn req_op(&self, value: u32) -> Option<&Operation> {
        self.req_by_value.get(&value).and_then(|name| self.msgs.get(name))
    }

    /// Reverse lookup from a wire-level response identifier.
    pub fn rsp_op(&self, value: u32) -> Option<&Operation> {
        self.rsp_by_value.get(&value).and_then(|name| self.msgs.get(name))
    }

    /// Resolves an operation's payload attribute set into the set itself.
    pub fn op_attr_set(&self, op: &Operation) -> Option<&AttrSet> {
        op.attr_set().and_then(|name| self.attr_sets.get(name))
    }

    /// The family's own resolution step: build attribute sets, enumerate
    /// operations under the declared id policy, then derive the reverse id
    /// indexes and the valid-operation view. Newly constructed elements are
    /// queued for their own steps on the next engine pass.
    pub(crate) fn resolve_root(&mut self, pending: &mut Vec<ElemRef>) -> Result<(), ResolveError> {
        self.core.begin_resolve()?;
        let raw = self.core.raw().clone();

        self.proto = raw
            .get_str("protocol")
            .unwrap_or(DEFAULT_PROTOCOL)
            .to_string();

        for set_node in raw.sequence("attribute-sets")? {
            let set = AttrSet::new(set_node)?;
            let set_name = set.name().to_string();
            if self.attr_sets.contains_key(&set_name) {
                return Err(SpecError::DuplicateAttrSet(set_name).into());
            }
            pending.push(ElemRef::AttrSet(set_name.clone()));
            for attr in set.attrs() {
                pending.push(ElemRef::Attr {
                    set: set_name.clone(),
                    name: attr.name().to_string(),
                });
            }
            self.attr_sets.insert(set_name, set);
        }

        if let Some(ops_node) = raw.get("operations") {
            let list = ops_node.sequence("list")?;
            match ops_node.get_str("enum-model").unwrap_or("unified") {
                "unified" => self.enumerate_unified(&list, pending)?,
                "directional" => self.enumerate_directional(&list, pending)?,
                other => return Err(SpecError::UnknownEnumModel(other.to_string()).into()),
            }
        }

        for (name, op) in &self.msgs {
            if let Some(v) = op.req_value() {
                self.req_by_value.insert(v, name.clone());
            }
            if let Some(v) = op.rsp_value() {
                self.rsp_by_value.insert(v, name.clone());
            }
            if !op.is_async() && op.raw().contains("attribute-set") {
                self.ops.push(name.clone());
            }
        }

        self.core.finish_resolve();
        Ok(())
    }

    /// Unified enumeration: one counter shared by both directions, so every
    /// operation's request and response identifiers are equal.
    fn enumerate_unified(
        &mut self,
        list: &[Node],
        pending: &mut Vec<ElemRef>,
    ) -> Result<(), SpecError> {
        let mut val: u32 = 0;
        for node in list {
            if let Some(v) = node.get_u32("value")? {
                val = v;
            }
            let op = Operation::new(node.clone(), Some(val), Some(val))?;
            val = next_id(val, op.name())?;
            self.insert_op(op, pending)?;
        }
        Ok(())
    }

    /// Directional enumeration: independent request and response counters.
    ///
    /// A notification consumes only the response counter and never moves the
    /// request baseline. A call always advances the request counter and
    /// advances (and assigns) the response counter only when it declares a
    /// reply. Anything else cannot be classified and fails the load.
    fn enumerate_directional(
        &mut self,
        list: &[Node],
        pending: &mut Vec<ElemRef>,
    ) -> Result<(), SpecError> {
        let mut req: u32 = 0;
        let mut rsp: u32 = 0;
        for node in list {
            let (op, req_next, rsp_next) = if node.contains("notify") {
                if let Some(v) = node.get_u32("value")? {
                    rsp = v;
                }
                let op = Operation::new(node.clone(), None, Some(rsp))?;
                let rsp_next = next_id(rsp, op.name())?;
                (op, req, rsp_next)
            } else if let Some(mode) = node.get("do").or_else(|| node.get("dump")) {
                if let Some(request) = mode.get("request") {
                    if let Some(v) = request.get_u32("value")? {
                        req = v;
                    }
                }
                if let Some(reply) = mode.get("reply") {
                    if let Some(v) = reply.get_u32("value")? {
                        rsp = v;
                    }
                }
                let has_reply = mode.contains("reply");
                let op = Operation::new(node.clone(), Some(req), has_reply.then_some(rsp))?;
                let req_next = next_id(req, op.name())?;
                let rsp_next = if has_reply { next_id(rsp, op.name())? } else { rsp };
                (op, req_next, rsp_next)
            } else {
                let name = node.get_str("name").unwrap_or("<unnamed>");
                return Err(SpecError::CannotClassify(name.to_string()));
            };

            req = req_next;
            rsp = rsp_next;
            self.insert_op(op, pending)?;
        }
        Ok(())
    }

    /// Inserts a freshly enumerated operation into the name catalog and
    /// queues it for resolution. Insertion happens before resolution runs so
    /// that notification aliases can look their target up by name.
    fn insert_op(&mut self, op: Operation, pending: &mut Vec<ElemRef>) -> Result<(), SpecError> {
        let name = op.name().to_string();
        if self.msgs.contains_key(&name) {
            return Err(SpecError::DuplicateOperation(name));
        }
        pending.push(ElemRef::Op(name.clone()));
        self.msgs.insert(name, op);
        Ok(())
    }

    pub(crate) fn resolve_attr_set(&mut self, name: &str) -> Result<(), ResolveError> {
        let set = self
            .attr_sets
            .get_mut(name)
            .ok_or_else(|| SpecError::UnknownElement(name.to_string()))?;
        set.begin_resolve()?;
        set.finish_resolve();
        Ok(())
    }

    pub(crate) fn resolve_attr(&mut self, set: &str, name: &str) -> Result<(), ResolveError> {
        let attr = self
            .attr_sets
            .get_mut(set)
            .and_then(|s| s.attr_mut(name))
            .ok_or_else(|| SpecError::UnknownElement(format!("{set}.{name}")))?;
        attr.begin_resolve()?;
        attr.finish_resolve();
        Ok(())
    }

    /// An operation's resolution step: determine its payload attribute set.
    ///
    /// Rules, in order: an explicitly declared attribute-set name; the
    /// attribute-set name declared by the operation this one notifies about
    /// (re-resolved independently, not borrowed as a pointer); nothing for a
    /// reserved placeholder. An operation matching none of these is a
    /// specification defect. Name lookups that fail are treated as deferred
    /// and retried by the engine; if they never succeed the load fails with
    /// the stall diagnostic.
    pub(crate) fn resolve_operation(&mut self, name: &str) -> Result<(), ResolveError> {
        let (raw, kind) = {
            let op = self
                .msgs
                .get_mut(name)
                .ok_or_else(|| SpecError::UnknownElement(name.to_string()))?;
            op.begin_resolve()?;
            (op.raw().clone(), op.kind())
        };

        let attr_set = if let Some(set) = raw.get_str("attribute-set") {
            Some(set.to_string())
        } else if let Some(target) = raw.get_str("notify") {
            let target_op = self
                .msgs
                .get(target)
                .ok_or_else(|| DeferredRef::Operation(target.to_string()))?;
            let borrowed = target_op
                .raw()
                .get_str("attribute-set")
                .ok_or_else(|| DeferredRef::NotifyPayload(target.to_string()))?;
            Some(borrowed.to_string())
        } else if kind == OpKind::Reserved {
            None
        } else {
            return Err(SpecError::NoAttrSet(name.to_string()).into());
        };

        if let Some(set) = &attr_set {
            if !self.attr_sets.contains_key(set) {
                return Err(DeferredRef::AttrSet(set.clone()).into());
            }
        }

        if let Some(op) = self.msgs.get_mut(name) {
            op.set_attr_set(attr_set);
            op.finish_resolve();
        }
        Ok(())
    }
}

fn next_id(val: u32, after: &str) -> Result<u32, SpecError> {
    val.checked_add(1).ok_or_else(|| SpecError::IdOverflow {
        after: after.to_string(),
    })
}
