use thiserror::Error;

/// The error taxonomy the data core reports failures through.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("structural error: {0}")]
    Structural(String),
    #[error("schema-binding error: {0}")]
    SchemaBinding(String),
    #[error("type error: {0}")]
    Type(String),
    #[error("reference error: {0}")]
    Reference(String),
    #[error("semantic error: {0}")]
    Semantic(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    pub fn schema_binding(msg: impl Into<String>) -> Self {
        Self::SchemaBinding(msg.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Self {
        Self::Type(msg.into())
    }

    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    pub fn semantic(msg: impl Into<String>) -> Self {
        Self::Semantic(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Ternary parse status: a hard failure unwinds and discards the whole
/// result; a soft discard drops only the node currently being built,
/// without setting an error.
#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),
    HardFail(CoreError),
    SoftDiscard,
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(v) => Outcome::Ok(f(v)),
            Outcome::HardFail(e) => Outcome::HardFail(e),
            Outcome::SoftDiscard => Outcome::SoftDiscard,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
