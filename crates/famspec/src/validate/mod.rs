//! Structural validation of raw specification documents.
//!
//! Deep, protocol-specific schema validation belongs to an external schema
//! document and validator; this crate only defines the seam. A validator is
//! injected into the loader and invoked exactly once, before any model
//! element is constructed, so a violation never exposes a partial model.
//!
//! Two implementations ship with the crate: [`Unvalidated`] for documents
//! checked elsewhere, and [`ShapeValidator`] for the basic structural rules
//! every protocol shares.

use serde_yaml::Value;

use crate::error::SchemaViolation;

/// Validates a raw specification document before the model is built.
pub trait SchemaValidator {
    fn validate(&self, doc: &Value) -> Result<(), SchemaViolation>;
}

/// Accepts any document. For documents already validated against a
/// protocol schema by an external tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unvalidated;

impl SchemaValidator for Unvalidated {
    fn validate(&self, _doc: &Value) -> Result<(), SchemaViolation> {
        Ok(())
    }
}

/// Checks the structural rules shared by every protocol kind: the blocks
/// that exist must have the right shapes and every entry that needs a name
/// has one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeValidator;

impl SchemaValidator for ShapeValidator {
    fn validate(&self, doc: &Value) -> Result<(), SchemaViolation> {
        if !doc.is_mapping() {
            return Err(SchemaViolation::new("$", "document is not a mapping"));
        }

        if let Some(proto) = doc.get("protocol") {
            if !proto.is_string() {
                return Err(SchemaViolation::new("protocol", "must be a string"));
            }
        }

        if let Some(sets) = doc.get("attribute-sets") {
            let sets = sets
                .as_sequence()
                .ok_or_else(|| SchemaViolation::new("attribute-sets", "must be a sequence"))?;
            for (i, set) in sets.iter().enumerate() {
                let at = format!("attribute-sets[{i}]");
                require_named_mapping(set, &at)?;
                let attrs = set
                    .get("attributes")
                    .ok_or_else(|| SchemaViolation::new(&at, "missing 'attributes'"))?;
                let attrs = attrs
                    .as_sequence()
                    .ok_or_else(|| SchemaViolation::new(format!("{at}.attributes"), "must be a sequence"))?;
                for (j, attr) in attrs.iter().enumerate() {
                    require_named_mapping(attr, &format!("{at}.attributes[{j}]"))?;
                }
            }
        }

        if let Some(ops) = doc.get("operations") {
            if !ops.is_mapping() {
                return Err(SchemaViolation::new("operations", "must be a mapping"));
            }
            if let Some(model) = ops.get("enum-model") {
                match model.as_str() {
                    Some("unified") | Some("directional") => {}
                    _ => {
                        return Err(SchemaViolation::new(
                            "operations.enum-model",
                            "must be 'unified' or 'directional'",
                        ));
                    }
                }
            }
            if let Some(list) = ops.get("list") {
                let list = list
                    .as_sequence()
                    .ok_or_else(|| SchemaViolation::new("operations.list", "must be a sequence"))?;
                for (i, op) in list.iter().enumerate() {
                    require_named_mapping(op, &format!("operations.list[{i}]"))?;
                }
            }
        }

        Ok(())
    }
}

fn require_named_mapping(entry: &Value, at: &str) -> Result<(), SchemaViolation> {
    if !entry.is_mapping() {
        return Err(SchemaViolation::new(at, "entry is not a mapping"));
    }
    match entry.get("name") {
        Some(name) if name.is_string() => Ok(()),
        Some(_) => Err(SchemaViolation::new(at, "'name' must be a string")),
        None => Err(SchemaViolation::new(at, "missing 'name'")),
    }
}
