use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{HAND_DOMAIN, TABLE_DOMAIN};
use crate::domain::{BlindType, Chips, GameVariant, HandNumber, PlayerStack, PotAward, SeatIndex};
use crate::engine::actions::ActionKind;

/// Любая команда. Адресат определяется обложкой `CommandBook`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Command {
    Table(TableCommand),
    Hand(HandCommand),
}

impl Command {
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Table(c) => c.command_type(),
            Command::Hand(c) => c.command_type(),
        }
    }

    /// Домен агрегата, которому предназначена команда.
    pub fn domain(&self) -> &'static str {
        self.command_type().domain()
    }
}

/// Стабильный дискриминант команды: ключ компенсаций, логов и кодека.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandType {
    CreateTable,
    JoinTable,
    LeaveTable,
    SitOut,
    SitIn,
    AddChips,
    PauseTable,
    ResumeTable,
    StartHand,
    EndHand,
    DealCards,
    PostBlind,
    PlayerAction,
    DealCommunityCards,
    StartDraw,
    RequestDraw,
    AwardPot,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandType::CreateTable => "CreateTable",
            CommandType::JoinTable => "JoinTable",
            CommandType::LeaveTable => "LeaveTable",
            CommandType::SitOut => "SitOut",
            CommandType::SitIn => "SitIn",
            CommandType::AddChips => "AddChips",
            CommandType::PauseTable => "PauseTable",
            CommandType::ResumeTable => "ResumeTable",
            CommandType::StartHand => "StartHand",
            CommandType::EndHand => "EndHand",
            CommandType::DealCards => "DealCards",
            CommandType::PostBlind => "PostBlind",
            CommandType::PlayerAction => "PlayerAction",
            CommandType::DealCommunityCards => "DealCommunityCards",
            CommandType::StartDraw => "StartDraw",
            CommandType::RequestDraw => "RequestDraw",
            CommandType::AwardPot => "AwardPot",
        }
    }

    pub fn domain(self) -> &'static str {
        match self {
            CommandType::DealCards
            | CommandType::PostBlind
            | CommandType::PlayerAction
            | CommandType::DealCommunityCards
            | CommandType::StartDraw
            | CommandType::RequestDraw
            | CommandType::AwardPot => HAND_DOMAIN,
            _ => TABLE_DOMAIN,
        }
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Команды стола
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum TableCommand {
    CreateTable(CreateTable),
    JoinTable(JoinTable),
    LeaveTable(LeaveTable),
    SitOut(SitOut),
    SitIn(SitIn),
    AddChips(AddChips),
    PauseTable(PauseTable),
    ResumeTable,
    StartHand,
    EndHand(EndHand),
}

impl TableCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            TableCommand::CreateTable(_) => CommandType::CreateTable,
            TableCommand::JoinTable(_) => CommandType::JoinTable,
            TableCommand::LeaveTable(_) => CommandType::LeaveTable,
            TableCommand::SitOut(_) => CommandType::SitOut,
            TableCommand::SitIn(_) => CommandType::SitIn,
            TableCommand::AddChips(_) => CommandType::AddChips,
            TableCommand::PauseTable(_) => CommandType::PauseTable,
            TableCommand::ResumeTable => CommandType::ResumeTable,
            TableCommand::StartHand => CommandType::StartHand,
            TableCommand::EndHand(_) => CommandType::EndHand,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTable {
    pub table_name: String,
    pub game_variant: GameVariant,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub max_players: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinTable {
    pub player_root: Uuid,
    /// Желаемое место; `None` – первое свободное.
    pub preferred_seat: Option<SeatIndex>,
    pub buy_in_amount: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveTable {
    pub player_root: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitOut {
    pub player_root: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitIn {
    pub player_root: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddChips {
    pub player_root: Uuid,
    pub amount: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PauseTable {
    pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndHand {
    pub hand_root: Uuid,
    /// Пусто – раздача отменена, стеки не трогаем.
    pub final_stacks: Vec<PlayerStack>,
}

// ---------------------------------------------------------------------------
// Команды раздачи
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum HandCommand {
    DealCards(DealCards),
    PostBlind(PostBlind),
    PlayerAction(PlayerAction),
    DealCommunityCards(DealCommunityCards),
    StartDraw,
    RequestDraw(RequestDraw),
    AwardPot(AwardPot),
}

impl HandCommand {
    pub fn command_type(&self) -> CommandType {
        match self {
            HandCommand::DealCards(_) => CommandType::DealCards,
            HandCommand::PostBlind(_) => CommandType::PostBlind,
            HandCommand::PlayerAction(_) => CommandType::PlayerAction,
            HandCommand::DealCommunityCards(_) => CommandType::DealCommunityCards,
            HandCommand::StartDraw => CommandType::StartDraw,
            HandCommand::RequestDraw(_) => CommandType::RequestDraw,
            HandCommand::AwardPot(_) => CommandType::AwardPot,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealCards {
    pub table_root: Uuid,
    pub hand_number: HandNumber,
    pub game_variant: GameVariant,
    pub dealer_position: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub players: Vec<PlayerStack>,
    /// Seed тасовки. `None` – системный RNG.
    pub deck_seed: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostBlind {
    pub player_root: Uuid,
    pub blind_type: BlindType,
    pub amount: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_root: Uuid,
    pub action: ActionKind,
    /// Фишки, которые игрок добавляет этим действием (для Bet/Raise/AllIn).
    pub amount: Chips,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DealCommunityCards {
    pub count: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestDraw {
    pub player_root: Uuid,
    /// Индексы сбрасываемых карт в руке (0..5).
    pub discard_indices: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AwardPot {
    pub awards: Vec<PotAward>,
}
