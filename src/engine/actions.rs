use serde::{Deserialize, Serialize};

/// Тип действия игрока в раунде ставок.
///
/// Сумма передаётся отдельно (`PlayerAction::amount`) – это фишки,
/// которые игрок добавляет именно этим действием.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    /// Bet на улице, где ещё нет ставки.
    Bet,
    /// Raise существующей ставки.
    Raise,
    /// All-in – поставить весь стек.
    AllIn,
}
