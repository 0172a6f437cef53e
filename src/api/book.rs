//! Адресация и "книги" событий/команд: Cover, EventPage/EventBook, CommandPage/CommandBook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::commands::{Command, CommandType};
use crate::api::events::Event;
use crate::engine::hand::HandState;
use crate::engine::table::TableState;

/// Адрес потока: (domain, root, correlation_id).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cover {
    pub domain: String,
    pub root: Uuid,
    pub correlation_id: String,
}

impl Cover {
    pub fn new(domain: impl Into<String>, root: Uuid, correlation_id: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            root,
            correlation_id: correlation_id.into(),
        }
    }
}

/// Одно событие потока с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventPage {
    pub sequence: u64,
    pub event: Event,
    pub created_at: DateTime<Utc>,
}

/// Состояние агрегата внутри снапшота.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SnapshotState {
    Table(TableState),
    Hand(HandState),
}

/// Снапшот: состояние после события с номером `sequence`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub sequence: u64,
    pub state: SnapshotState,
}

/// История потока: опциональный снапшот + страницы после него.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventBook {
    pub cover: Cover,
    pub snapshot: Option<Snapshot>,
    pub pages: Vec<EventPage>,
}

impl EventBook {
    /// Пустая книга (новый поток).
    pub fn new(cover: Cover) -> Self {
        Self {
            cover,
            snapshot: None,
            pages: Vec::new(),
        }
    }

    /// Номер последнего известного события (страницы или снапшота).
    pub fn last_sequence(&self) -> Option<u64> {
        self.pages
            .last()
            .map(|p| p.sequence)
            .or_else(|| self.snapshot.as_ref().map(|s| s.sequence))
    }

    /// Номер, который получит следующее событие.
    pub fn next_sequence(&self) -> u64 {
        self.last_sequence().map_or(0, |s| s + 1)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.pages.iter().map(|p| &p.event)
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Одна команда. `sequence` – ожидание отправителя о следующем номере
/// в целевом потоке (0, если поток новый или номер неизвестен).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommandPage {
    pub sequence: u64,
    pub command: Command,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommandBook {
    pub cover: Cover,
    pub pages: Vec<CommandPage>,
}

impl CommandBook {
    /// Книга из одной команды – обычный случай.
    pub fn single(cover: Cover, sequence: u64, command: Command) -> Self {
        Self {
            cover,
            pages: vec![CommandPage { sequence, command }],
        }
    }

    pub fn first_command(&self) -> Option<&Command> {
        self.pages.first().map(|p| &p.command)
    }

    /// Тип первой команды – ключ для компенсаций и логов.
    pub fn command_type(&self) -> Option<CommandType> {
        self.first_command().map(Command::command_type)
    }
}
