//! Arena-backed YANG schema-tree model consumed (but not owned) by the data
//! core: modules, identities, type descriptors, and the schema node tree
//! that instance elements are resolved against when parsing XML/JSON.
//!
//! Textual YANG/YIN parsing is out of scope; a [`SchemaContext`] is built
//! programmatically by whatever owns the compiled schema.

pub mod arena;
pub mod context;
pub mod error;
pub mod identity;
pub mod module;
pub mod node;
pub mod types;

pub use arena::{Arena, Ref};
pub use context::SchemaContext;
pub use error::SchemaError;
pub use identity::{Identity, IdentityTable};
pub use module::Module;
pub use node::{resolve_in, NodeFlags, NodeType, SchemaNode, Status};
pub use types::{BitValue, EnumValue, NumericRange, StringConstraints, Type, TypeBase};
