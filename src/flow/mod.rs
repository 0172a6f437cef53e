//! Оркестрация раздачи: процесс-менеджер и компенсации отклонённых команд.

pub mod compensation;
pub mod hand_flow;
pub mod process;

pub use compensation::{CompensationHandler, CompensationRouter, IssuerType, RejectionNotification};
pub use hand_flow::{HandFlow, HAND_FLOW_NAME};
pub use process::{HandPhase, HandProcess, ProcessSeat};
