use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::chips::Chips;

/// Игрок на месте за столом (состояние агрегата стола, не раздачи).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub player_root: Uuid,
    /// Текущий стек за столом.
    pub stack: Chips,
    /// Игрок сидит, но пропускает раздачи.
    pub sitting_out: bool,
    /// Участвует в текущей раздаче (стек "заморожен" до HandEnded).
    pub in_hand: bool,
}

impl Seat {
    pub fn new(player_root: Uuid, stack: Chips) -> Self {
        Self {
            player_root,
            stack,
            sitting_out: false,
            in_hand: false,
        }
    }

    /// Может ли игрок попасть в следующую раздачу.
    pub fn is_eligible(&self) -> bool {
        !self.sitting_out && !self.stack.is_zero()
    }
}
