//! Ядро движка: агрегаты стола и раздачи, пересборка состояния, маршрутизация команд.
//!
//! Основные операции:
//!   - `CommandRouter::dispatch` – выполнить CommandBook против истории
//!   - `rebuild` – свернуть EventBook в состояние агрегата
//!   - `Aggregate::handle` – чистый обработчик команды (guard/validate/compute/build)

pub mod actions;
pub mod aggregate;
pub mod betting;
pub mod errors;
pub mod hand;
pub mod positions;
pub mod pot;
pub mod rebuild;
pub mod router;
pub mod table;
pub mod validation;

pub use actions::ActionKind;
pub use aggregate::{Aggregate, HandlerContext};
pub use betting::BettingState;
pub use errors::{Rejection, RejectionKind};
pub use hand::{HandAggregate, HandPlayer, HandState};
pub use rebuild::{rebuild, rebuild_with_sequence};
pub use router::CommandRouter;
pub use table::{TableAggregate, TableState, TableStatus};

/// RNG интерфейс для engine.
/// Реализации – в infra (обёртки над `rand`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
