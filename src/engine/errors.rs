use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Отказ в выполнении команды. Возвращается значением, агрегат не меняется.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// Команда сформирована неверно (сумма, индексы, лимиты).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Состояние агрегата не допускает команду.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// Упомянутая сущность (игрок, место) не найдена.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Вид отказа без сообщения.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    InvalidArgument,
    FailedPrecondition,
    NotFound,
}

impl Rejection {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Rejection::InvalidArgument(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Rejection::FailedPrecondition(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Rejection::NotFound(msg.into())
    }

    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::InvalidArgument(_) => RejectionKind::InvalidArgument,
            Rejection::FailedPrecondition(_) => RejectionKind::FailedPrecondition,
            Rejection::NotFound(_) => RejectionKind::NotFound,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rejection::InvalidArgument(m)
            | Rejection::FailedPrecondition(m)
            | Rejection::NotFound(m) => m,
        }
    }
}
