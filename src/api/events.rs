//! События агрегатов стола и раздачи.
//!
//! Внутри движка диспетчеризация идёт только по закрытым enum'ам ниже;
//! строковые type URL живут лишь в `api::codec`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BettingPhase, BlindType, Card, Chips, GameVariant, HandNumber, PlayerHoleCards, PlayerStack,
    PotAward, SeatIndex,
};
use crate::engine::actions::ActionKind;

/// Любое событие потока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Event {
    Table(TableEvent),
    Hand(HandEvent),
    /// Тип, которого эта версия не знает. При пересборке состояния пропускается.
    Unknown { type_url: String },
}

impl Event {
    /// Короткое имя типа (для логов).
    pub fn type_name(&self) -> &str {
        match self {
            Event::Table(e) => e.type_name(),
            Event::Hand(e) => e.type_name(),
            Event::Unknown { type_url } => type_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Стол
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum TableEvent {
    TableCreated(TableCreated),
    PlayerJoined(PlayerJoined),
    PlayerLeft(PlayerLeft),
    PlayerSatOut(PlayerSatOut),
    PlayerSatIn(PlayerSatIn),
    ChipsAdded(ChipsAdded),
    TablePaused(TablePaused),
    TableResumed,
    HandStarted(HandStarted),
    HandEnded(HandEnded),
}

impl TableEvent {
    pub const TYPE_NAMES: &'static [&'static str] = &[
        "TableCreated",
        "PlayerJoined",
        "PlayerLeft",
        "PlayerSatOut",
        "PlayerSatIn",
        "ChipsAdded",
        "TablePaused",
        "TableResumed",
        "HandStarted",
        "HandEnded",
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            TableEvent::TableCreated(_) => "TableCreated",
            TableEvent::PlayerJoined(_) => "PlayerJoined",
            TableEvent::PlayerLeft(_) => "PlayerLeft",
            TableEvent::PlayerSatOut(_) => "PlayerSatOut",
            TableEvent::PlayerSatIn(_) => "PlayerSatIn",
            TableEvent::ChipsAdded(_) => "ChipsAdded",
            TableEvent::TablePaused(_) => "TablePaused",
            TableEvent::TableResumed => "TableResumed",
            TableEvent::HandStarted(_) => "HandStarted",
            TableEvent::HandEnded(_) => "HandEnded",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableCreated {
    pub table_name: String,
    pub game_variant: GameVariant,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub max_players: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerJoined {
    pub player_root: Uuid,
    pub seat_position: SeatIndex,
    pub stack: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerLeft {
    pub player_root: Uuid,
    pub seat_position: SeatIndex,
    pub chips_cashed_out: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSatOut {
    pub player_root: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerSatIn {
    pub player_root: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChipsAdded {
    pub player_root: Uuid,
    pub amount: Chips,
    pub new_stack: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablePaused {
    pub reason: String,
}

/// Стол начал раздачу. Отсюда процесс-менеджер узнаёт всё, что нужно для DealCards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandStarted {
    pub hand_root: Uuid,
    pub hand_number: HandNumber,
    pub game_variant: GameVariant,
    pub dealer_position: SeatIndex,
    pub small_blind_position: SeatIndex,
    pub big_blind_position: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Участники раздачи в порядке мест.
    pub players: Vec<PlayerStack>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandEnded {
    pub hand_root: Uuid,
    /// Итоговые стеки участников. Пусто – стеки не меняются (раздача отменена).
    pub final_stacks: Vec<PlayerStack>,
}

// ---------------------------------------------------------------------------
// Раздача
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum HandEvent {
    CardsDealt(CardsDealt),
    BlindPosted(BlindPosted),
    ActionTaken(ActionTaken),
    CommunityCardsDealt(CommunityCardsDealt),
    DrawStarted,
    DrawCompleted(DrawCompleted),
    PotAwarded(PotAwarded),
    HandComplete(HandComplete),
}

impl HandEvent {
    pub const TYPE_NAMES: &'static [&'static str] = &[
        "CardsDealt",
        "BlindPosted",
        "ActionTaken",
        "CommunityCardsDealt",
        "DrawStarted",
        "DrawCompleted",
        "PotAwarded",
        "HandComplete",
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            HandEvent::CardsDealt(_) => "CardsDealt",
            HandEvent::BlindPosted(_) => "BlindPosted",
            HandEvent::ActionTaken(_) => "ActionTaken",
            HandEvent::CommunityCardsDealt(_) => "CommunityCardsDealt",
            HandEvent::DrawStarted => "DrawStarted",
            HandEvent::DrawCompleted(_) => "DrawCompleted",
            HandEvent::PotAwarded(_) => "PotAwarded",
            HandEvent::HandComplete(_) => "HandComplete",
        }
    }
}

/// Карты розданы. Остаток колоды лежит в событии, чтобы реплей был детерминированным.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardsDealt {
    pub table_root: Uuid,
    pub hand_number: HandNumber,
    pub game_variant: GameVariant,
    pub dealer_position: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub players: Vec<PlayerStack>,
    pub hole_cards: Vec<PlayerHoleCards>,
    pub remaining_deck: Vec<Card>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlindPosted {
    pub player_root: Uuid,
    pub blind_type: BlindType,
    /// Сколько реально поставлено (не больше стека).
    pub amount: Chips,
    pub player_stack: Chips,
    pub pot_total: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionTaken {
    pub player_root: Uuid,
    /// Итоговое действие: опустошивший стек Call/Bet/Raise записывается как AllIn.
    pub action: ActionKind,
    /// Фишки, добавленные этим действием.
    pub amount: Chips,
    pub player_stack: Chips,
    pub pot_total: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommunityCardsDealt {
    pub cards: Vec<Card>,
    /// Новая улица.
    pub phase: BettingPhase,
    pub all_community_cards: Vec<Card>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawCompleted {
    pub player_root: Uuid,
    pub discarded: Vec<Card>,
    pub new_cards: Vec<Card>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAwarded {
    pub winners: Vec<PotAward>,
    pub pot_total: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandComplete {
    pub table_root: Uuid,
    pub hand_number: HandNumber,
    pub winners: Vec<PotAward>,
    /// Стек каждого участника после выплаты.
    pub final_stacks: Vec<PlayerStack>,
}
