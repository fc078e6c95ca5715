use thiserror::Error;

/// Every way a core operation can fail, surfaced textually to the facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    #[error("invalid operand '{0}'")]
    InvalidOperand(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("instruction not implemented: '{0}'")]
    NotImplemented(String),

    #[error("divide by zero")]
    DivideByZero,

    #[error("malformed memory address '{0}'")]
    MalformedAddress(String),
}
