use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::SeatIndex;

/// Фаза ставок внутри раздачи (улица).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BettingPhase {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
    /// Обмен карт и финальный раунд ставок после него (Five Card Draw).
    Draw,
    Showdown,
}

/// Какой блайнд ставит игрок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindType {
    Small,
    Big,
}

/// Игрок и его стек на конкретном месте (снимок для начала/конца раздачи).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerStack {
    pub player_root: Uuid,
    pub position: SeatIndex,
    pub stack: Chips,
}

/// Карманные карты одного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerHoleCards {
    pub player_root: Uuid,
    pub position: SeatIndex,
    pub cards: Vec<Card>,
}

/// Выплата из банка одному победителю.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub player_root: Uuid,
    pub amount: Chips,
}
