use thiserror::Error;

/// Errors raised while assembling a [`crate::SchemaContext`].
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("duplicate identity {name:?} in module {module:?}")]
    DuplicateIdentity { module: String, name: String },
    #[error("module {0:?} was not found in the schema context")]
    UnknownModule(String),
}
