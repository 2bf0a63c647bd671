//! Data model for message-family specifications.
//!
//! This module contains the resolved model entities:
//! - Attribute sets and attributes (numeric identifier spaces)
//! - Operations (calls, notifications, reserved placeholders)
//! - The family root container that owns and resolves everything

pub mod attr;
pub(crate) mod element;
pub mod family;
pub mod op;

pub use attr::{Attr, AttrSet};
pub use family::{DEFAULT_PROTOCOL, Family};
pub use op::{OpKind, Operation};
