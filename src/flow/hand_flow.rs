//! Процесс-менеджер раздачи: ведёт раздачу от HandStarted до EndHand,
//! реагируя на события стола и раздачи и выдавая следующие команды.

use std::collections::HashMap;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{
    CommandBook, CommandType, Cover, Event, EventBook, TableEvent, HAND_DOMAIN, TABLE_DOMAIN,
};
use crate::engine::errors::Rejection;
use crate::flow::compensation::{CompensationRouter, IssuerType, RejectionNotification};
use crate::flow::process::{HandPhase, HandProcess};
use crate::infra::config::EngineConfig;

/// Имя процесса в уведомлениях об отказе.
pub const HAND_FLOW_NAME: &str = "hand-flow";

/// Отказ от DealCards/PostBlind: раздача не может начаться, стол освобождается
/// без изменения стеков.
fn release_table(_notification: &RejectionNotification, process: &HandProcess) -> Vec<CommandBook> {
    vec![process.end_hand(Vec::new())]
}

pub struct HandFlow {
    config: EngineConfig,
    processes: HashMap<Uuid, HandProcess>,
    compensation: CompensationRouter<HandProcess>,
}

impl HandFlow {
    pub fn new(config: EngineConfig) -> Self {
        let compensation = CompensationRouter::new()
            .on(HAND_DOMAIN, CommandType::DealCards, release_table)
            .on(HAND_DOMAIN, CommandType::PostBlind, release_table);
        Self {
            config,
            processes: HashMap::new(),
            compensation,
        }
    }

    pub fn process(&self, hand_root: &Uuid) -> Option<&HandProcess> {
        self.processes.get(hand_root)
    }

    pub fn active_hands(&self) -> usize {
        self.processes.len()
    }

    /// Вернуть восстановленный процесс (после рестарта координатора).
    pub fn restore(&mut self, process: HandProcess) {
        self.processes.insert(process.hand_root, process);
    }

    /// Разобрать новые события потока и выдать команды-продолжения.
    pub fn handle(&mut self, book: &EventBook) -> Vec<CommandBook> {
        let mut out = Vec::new();
        for page in &book.pages {
            match &page.event {
                Event::Table(TableEvent::HandStarted(started)) if book.cover.domain == TABLE_DOMAIN => {
                    let mut process = HandProcess::new(&book.cover, started);
                    process.advance(HandPhase::Dealing);
                    let seed = self
                        .config
                        .seeded_decks
                        .then(|| started.hand_root.as_bytes().to_vec());
                    out.push(process.deal_cards_command(seed));
                    info!(
                        hand_root = %started.hand_root,
                        hand_number = started.hand_number,
                        players = started.players.len(),
                        "hand flow started"
                    );
                    self.processes.insert(started.hand_root, process);
                }
                Event::Hand(event) if book.cover.domain == HAND_DOMAIN => {
                    let root = book.cover.root;
                    let Some(process) = self.processes.get_mut(&root) else {
                        debug!(hand_root = %root, event = event.type_name(), "no process for hand event");
                        continue;
                    };
                    out.extend(process.on_hand_event(page.sequence, event));
                    if process.is_complete() {
                        info!(hand_root = %root, "hand flow complete");
                        self.processes.remove(&root);
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Уведомление об отказе для команды, выданной этим процессом.
    pub fn notification_for(
        command: &CommandBook,
        source: Option<(&Cover, u64)>,
        rejection: &Rejection,
    ) -> RejectionNotification {
        RejectionNotification {
            issuer_name: HAND_FLOW_NAME.to_string(),
            issuer_type: IssuerType::ProcessManager,
            source_event_sequence: source.map_or(0, |(_, seq)| seq),
            rejection_reason: rejection.to_string(),
            rejected_command: Some(command.clone()),
            source_aggregate_cover: source.map(|(cover, _)| cover.clone()),
        }
    }

    /// Компенсация отказа. Повторов нет: если компенсация выдана, процесс раздачи снимается.
    pub fn on_rejection(&mut self, notification: &RejectionNotification) -> Vec<CommandBook> {
        let Some(hand_root) = notification
            .rejected_command
            .as_ref()
            .filter(|c| c.cover.domain == HAND_DOMAIN)
            .map(|c| c.cover.root)
        else {
            return Vec::new();
        };
        let Some(process) = self.processes.get(&hand_root) else {
            warn!(%hand_root, "rejection for unknown hand process");
            return Vec::new();
        };

        let commands = self.compensation.dispatch(notification, process);
        if !commands.is_empty() {
            warn!(%hand_root, reason = %notification.rejection_reason, "hand aborted");
            self.processes.remove(&hand_root);
        }
        commands
    }

    /// Очерёдность хода (ставки и обмен): агрегат её не знает, проверяет процесс-менеджер.
    pub fn check_turn(&self, hand_root: &Uuid, player_root: &Uuid) -> Result<(), Rejection> {
        let Some(process) = self.processes.get(hand_root) else {
            return Ok(());
        };
        let seat = process.seat_of(player_root);
        let turn_based = matches!(process.phase, HandPhase::Betting | HandPhase::Draw);
        if turn_based && seat.is_some() && process.action_on != seat {
            return Err(Rejection::precondition("Not this player's turn"));
        }
        Ok(())
    }
}
