//! famspec: message-family specification model.
//!
//! This crate loads a declarative protocol specification — a document
//! describing a message family, its attribute identifier spaces, and its
//! operations — and turns it into a fully cross-referenced in-memory model
//! for downstream code generators and runtime encoders/decoders.
//!
//! # Overview
//!
//! Specification elements may be declared in any order and refer to each
//! other by name: an operation names the attribute set describing its
//! payload, a notification names the operation whose payload shape it
//! borrows. The loader resolves those references with an iterative
//! fixed-point engine, so authors never have to topologically sort their
//! documents, and derives the numeric identifiers the wire protocol uses:
//! attribute values within each set, and operation request/response values
//! under either a **unified** (one shared counter) or **directional**
//! (independent request/response counters) enumeration policy.
//!
//! # Quick Start
//!
//! ```rust
//! use famspec::{Family, Unvalidated};
//!
//! let doc = r#"
//! name: lights
//! protocol: genetlink
//!
//! attribute-sets:
//!   - name: lamp
//!     attributes:
//!       - name: id
//!       - name: brightness
//!         multi-attr: true
//!
//! operations:
//!   list:
//!     - name: lamp-get
//!       attribute-set: lamp
//!       do:
//!         request:
//!         reply:
//!     - name: lamp-ntf
//!       notify: lamp-get
//! "#;
//!
//! let family = Family::from_yaml(doc, &Unvalidated).unwrap();
//!
//! // Attribute values are assigned in declaration order.
//! let lamp = family.attr_set("lamp").unwrap();
//! assert_eq!(lamp.attr("brightness").unwrap().value(), 1);
//!
//! // The notification borrowed its payload shape from lamp-get.
//! let ntf = family.op("lamp-ntf").unwrap();
//! assert_eq!(ntf.attr_set(), Some("lamp"));
//! assert_eq!(family.op("lamp-get").unwrap().value(), Some(0));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Family, AttrSet, Attr, Operation)
//! - [`node`]: Typed read-only access to raw document fragments
//! - [`validate`]: The schema-validation seam and built-in validators
//! - [`error`]: Error types
//!
//! # Resolution
//!
//! Every element registers itself into a pending queue at construction
//! time; the engine sweeps the queue in passes, retrying elements whose
//! dependencies are not available yet, until a pass resolves everything
//! that remains or makes no progress at all. A stalled load fails with the
//! most recent missing reference as the diagnostic — a genuinely dangling
//! name terminates, it does not loop. The family is either fully resolved
//! or not produced at all; there is no partial model.

pub mod error;
pub mod model;
pub mod node;
mod resolve;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{DeferredRef, ResolveError, SchemaViolation, SpecError};
pub use model::{Attr, AttrSet, DEFAULT_PROTOCOL, Family, OpKind, Operation};
pub use node::Node;
pub use validate::{SchemaValidator, ShapeValidator, Unvalidated};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
