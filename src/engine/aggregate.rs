use std::fmt::Debug;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::{Command, Cover, Event, SnapshotState};
use crate::engine::errors::Rejection;
use crate::infra::config::EngineConfig;

/// Контекст обработки команды. Создаётся вызывающей стороной и передаётся вниз;
/// обработчики не читают ни часы, ни глобальное состояние.
#[derive(Clone, Debug)]
pub struct HandlerContext {
    pub now: DateTime<Utc>,
    pub correlation_id: String,
    pub config: EngineConfig,
}

impl HandlerContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            now: Utc::now(),
            correlation_id: Uuid::new_v4().to_string(),
            config,
        }
    }

    /// Контекст с фиксированным временем (реплей, тесты).
    pub fn at(now: DateTime<Utc>, correlation_id: impl Into<String>, config: EngineConfig) -> Self {
        Self {
            now,
            correlation_id: correlation_id.into(),
            config,
        }
    }
}

/// Агрегат: состояние выводится только свёрткой его событий.
///
/// `apply` обязан быть чистым и детерминированным, `handle` – не менять
/// состояние и возвращать события либо отказ.
pub trait Aggregate {
    /// Домен в `Cover`.
    const DOMAIN: &'static str;

    type State: Default + Clone + PartialEq + Debug;
    type Command: Debug;
    type Event: Clone + Debug;

    /// Выбрать команду этого агрегата из общего enum'а.
    fn select_command(command: &Command) -> Option<&Self::Command>;

    /// Выбрать событие этого агрегата; чужие и неизвестные – `None`.
    fn select_event(event: &Event) -> Option<&Self::Event>;

    fn wrap_event(event: Self::Event) -> Event;

    fn select_snapshot(state: &SnapshotState) -> Option<&Self::State>;

    fn wrap_snapshot(state: Self::State) -> SnapshotState;

    fn apply(state: &mut Self::State, event: &Self::Event);

    fn handle(
        &self,
        ctx: &HandlerContext,
        cover: &Cover,
        command: &Self::Command,
        state: &Self::State,
    ) -> Result<Vec<Self::Event>, Rejection>;
}
