//! Attribute model: single attributes and the ordered identifier spaces
//! that contain them.
//!
//! Attribute sets never reference elements outside their own entry list, so
//! the whole numeric value assignment runs at construction time; their
//! resolution step has nothing left to do.

use indexmap::IndexMap;

use crate::error::SpecError;
use crate::model::element::ElementCore;
use crate::node::Node;

/// A single attribute type within an [`AttrSet`].
#[derive(Debug, Clone)]
pub struct Attr {
    core: ElementCore,
    name: String,
    value: u32,
    is_multi: bool,
    set: String,
}

impl Attr {
    fn new(raw: Node, set: &str, value: u32) -> Result<Self, SpecError> {
        let core = ElementCore::from_node(raw);
        let name = core.require_name("attribute")?;
        let is_multi = core.raw().get_bool("multi-attr");
        Ok(Self {
            core,
            name,
            value,
            is_multi,
            set: set.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name normalized for use as a programming identifier.
    pub fn ident_name(&self) -> &str {
        self.core.ident_name().unwrap_or(&self.name)
    }

    /// Numeric identifier of this attribute on the wire, unique within the
    /// owning set.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// True if the attribute may repeat within a single message.
    pub fn is_multi(&self) -> bool {
        self.is_multi
    }

    /// Name of the owning attribute set.
    pub fn set_name(&self) -> &str {
        &self.set
    }

    pub(crate) fn begin_resolve(&mut self) -> Result<(), SpecError> {
        self.core.begin_resolve()
    }

    pub(crate) fn finish_resolve(&mut self) {
        self.core.finish_resolve();
    }
}

/// A named identifier space partitioning numeric attribute ids.
///
/// Keeps two mutually consistent indexes over the same attributes: by name
/// and by assigned value, both in declaration order.
#[derive(Debug, Clone)]
pub struct AttrSet {
    core: ElementCore,
    name: String,
    subset_of: Option<String>,
    attrs: IndexMap<String, Attr>,
    by_value: IndexMap<u32, String>,
}

impl AttrSet {
    /// Walks the declared attribute entries once, assigning values either
    /// explicitly or by auto-increment from the running counter.
    pub(crate) fn new(raw: Node) -> Result<Self, SpecError> {
        let core = ElementCore::from_node(raw);
        let name = core.require_name("attribute set")?;
        let subset_of = core.raw().get_str("subset-of").map(str::to_owned);

        let mut attrs = IndexMap::new();
        let mut by_value = IndexMap::new();
        let mut val: u32 = 0;
        for entry in core.raw().sequence("attributes")? {
            if let Some(v) = entry.get_u32("value")? {
                val = v;
            }

            let attr = Attr::new(entry, &name, val)?;
            if attrs.contains_key(attr.name()) {
                return Err(SpecError::DuplicateAttr {
                    set: name,
                    name: attr.name().to_string(),
                });
            }
            if by_value.insert(val, attr.name().to_string()).is_some() {
                return Err(SpecError::DuplicateAttrValue { set: name, value: val });
            }
            let attr_name = attr.name().to_string();
            val = match val.checked_add(1) {
                Some(next) => next,
                None => return Err(SpecError::IdOverflow { after: attr_name }),
            };
            attrs.insert(attr_name, attr);
        }

        Ok(Self {
            core,
            name,
            subset_of,
            attrs,
            by_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name normalized for use as a programming identifier.
    pub fn ident_name(&self) -> &str {
        self.core.ident_name().unwrap_or(&self.name)
    }

    /// Name of the parent set this one restricts, retained verbatim from the
    /// document. Never validated here; looking it up is the consumer's call.
    pub fn subset_of(&self) -> Option<&str> {
        self.subset_of.as_deref()
    }

    /// Looks an attribute up by name.
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.get(name)
    }

    /// Looks an attribute up by its assigned numeric value.
    pub fn attr_by_value(&self, value: u32) -> Option<&Attr> {
        self.by_value.get(&value).and_then(|name| self.attrs.get(name))
    }

    /// All attributes in declaration order.
    pub fn attrs(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.values()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub(crate) fn attr_mut(&mut self, name: &str) -> Option<&mut Attr> {
        self.attrs.get_mut(name)
    }

    pub(crate) fn begin_resolve(&mut self) -> Result<(), SpecError> {
        self.core.begin_resolve()
    }

    pub(crate) fn finish_resolve(&mut self) {
        self.core.finish_resolve();
    }
}
