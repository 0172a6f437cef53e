//! Локальный синхронный координатор: журнал + маршрутизаторы + процесс-менеджер.
//!
//! Один писатель на агрегат обеспечивается тем, что всё выполняется по очереди
//! из одной FIFO. Подходит для тестов и CLI, не для продакшена.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::api::{
    Command, CommandBook, Cover, Event, EventBook, HandCommand, Snapshot, TableEvent, HAND_DOMAIN,
    TABLE_DOMAIN,
};
use crate::engine::aggregate::{Aggregate, HandlerContext};
use crate::engine::errors::Rejection;
use crate::engine::hand::{HandAggregate, HandState};
use crate::engine::rebuild::{rebuild, rebuild_with_sequence};
use crate::engine::router::CommandRouter;
use crate::engine::table::{TableAggregate, TableState};
use crate::flow::{HandFlow, HandProcess, RejectionNotification};
use crate::infra::config::EngineConfig;
use crate::infra::persistence::{EventLog, InMemoryEventLog, LogError};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Log(#[from] LogError),
}

/// Команда в очереди. `origin` – поток и номер события, породившего команду
/// процесс-менеджера; у внешних команд его нет.
struct Pending {
    book: CommandBook,
    origin: Option<(Cover, u64)>,
}

pub struct LocalRuntime<L: EventLog = InMemoryEventLog> {
    config: EngineConfig,
    log: L,
    tables: CommandRouter<TableAggregate>,
    hands: CommandRouter<HandAggregate>,
    flow: HandFlow,
    rejections: Vec<RejectionNotification>,
    fixed_now: Option<DateTime<Utc>>,
}

impl LocalRuntime<InMemoryEventLog> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_log(config, InMemoryEventLog::new())
    }
}

impl<L: EventLog> LocalRuntime<L> {
    pub fn with_log(config: EngineConfig, log: L) -> Self {
        Self {
            flow: HandFlow::new(config.clone()),
            config,
            log,
            tables: CommandRouter::new(TableAggregate),
            hands: CommandRouter::new(HandAggregate),
            rejections: Vec::new(),
            fixed_now: None,
        }
    }

    /// Фиксированное время для всех событий (детерминированные тесты).
    pub fn with_fixed_time(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut L {
        &mut self.log
    }

    pub fn flow(&self) -> &HandFlow {
        &self.flow
    }

    /// Все отказы команд процесс-менеджера (с уже выполненной компенсацией).
    pub fn rejections(&self) -> &[RejectionNotification] {
        &self.rejections
    }

    pub fn table_state(&self, table_root: Uuid) -> TableState {
        rebuild::<TableAggregate>(&self.log.load(TABLE_DOMAIN, table_root))
    }

    pub fn hand_state(&self, hand_root: Uuid) -> HandState {
        rebuild::<HandAggregate>(&self.log.load(HAND_DOMAIN, hand_root))
    }

    fn context(&self, correlation_id: &str) -> HandlerContext {
        match self.fixed_now {
            Some(now) => HandlerContext::at(now, correlation_id, self.config.clone()),
            None => HandlerContext::at(Utc::now(), correlation_id, self.config.clone()),
        }
    }

    /// Внешняя команда. Выполняется сама и все команды, которые из неё вытекают,
    /// пока очередь не опустеет. Возвращаются события самой команды.
    pub fn submit(&mut self, command: CommandBook) -> Result<EventBook, RuntimeError> {
        self.check_hand_owner(&command)?;
        self.check_turn(&command)?;
        let produced = self.execute(&command)?;
        let origin = produced
            .last_sequence()
            .map(|seq| (produced.cover.clone(), seq));
        let follow = self.flow.handle(&produced);
        self.drain(follow, origin);
        Ok(produced)
    }

    /// Розданная и незавершённая раздача без процесса принимает команды,
    /// только пока стол считает её текущей (после компенсации – уже нет).
    fn check_hand_owner(&self, command: &CommandBook) -> Result<(), Rejection> {
        let hand_root = command.cover.root;
        if command.cover.domain != HAND_DOMAIN || self.flow.process(&hand_root).is_some() {
            return Ok(());
        }
        let deals_only = command
            .pages
            .iter()
            .all(|p| matches!(p.command, Command::Hand(HandCommand::DealCards(_))));
        if deals_only {
            return Ok(());
        }

        let hand = self.hand_state(hand_root);
        if !hand.dealt || hand.complete {
            return Ok(());
        }
        let table = self.table_state(hand.table_root);
        if table.current_hand_root != Some(hand_root) {
            return Err(Rejection::precondition("Hand is no longer active at its table"));
        }
        Ok(())
    }

    fn check_turn(&self, command: &CommandBook) -> Result<(), Rejection> {
        if command.cover.domain != HAND_DOMAIN {
            return Ok(());
        }
        for page in &command.pages {
            let player_root = match &page.command {
                Command::Hand(HandCommand::PlayerAction(a)) => a.player_root,
                Command::Hand(HandCommand::RequestDraw(d)) => d.player_root,
                _ => continue,
            };
            self.flow.check_turn(&command.cover.root, &player_root)?;
        }
        Ok(())
    }

    fn drain(&mut self, initial: Vec<CommandBook>, origin: Option<(Cover, u64)>) {
        let mut queue: VecDeque<Pending> = initial
            .into_iter()
            .map(|book| Pending {
                book,
                origin: origin.clone(),
            })
            .collect();

        while let Some(pending) = queue.pop_front() {
            match self.execute(&pending.book) {
                Ok(produced) => {
                    let origin = produced
                        .last_sequence()
                        .map(|seq| (produced.cover.clone(), seq));
                    for book in self.flow.handle(&produced) {
                        queue.push_back(Pending {
                            book,
                            origin: origin.clone(),
                        });
                    }
                }
                Err(RuntimeError::Rejected(rejection)) => {
                    let source = pending.origin.as_ref().map(|(cover, seq)| (cover, *seq));
                    let notification = HandFlow::notification_for(&pending.book, source, &rejection);
                    for book in self.flow.on_rejection(&notification) {
                        queue.push_back(Pending {
                            book,
                            origin: pending.origin.clone(),
                        });
                    }
                    self.rejections.push(notification);
                }
                Err(RuntimeError::Log(e)) => {
                    error!(error = %e, "event log refused append, command dropped");
                }
            }
        }
    }

    /// Выполнить одну команду и записать её события.
    fn execute(&mut self, command: &CommandBook) -> Result<EventBook, RuntimeError> {
        let cover = &command.cover;
        let prior = self.log.load(&cover.domain, cover.root);
        let ctx = self.context(&cover.correlation_id);

        let produced = match cover.domain.as_str() {
            TABLE_DOMAIN => self.tables.dispatch(&ctx, command, &prior)?,
            HAND_DOMAIN => self.hands.dispatch(&ctx, command, &prior)?,
            other => return Err(Rejection::invalid(format!("Unknown domain {other}")).into()),
        };

        self.log.append(&produced, prior.next_sequence())?;
        debug!(
            domain = %cover.domain,
            root = %cover.root,
            command = ?command.command_type(),
            events = produced.pages.len(),
            "events appended"
        );

        if let Some(every) = self.config.snapshot_every.filter(|n| *n > 0) {
            let crossed = produced.pages.iter().any(|p| (p.sequence + 1) % every == 0);
            if crossed {
                match cover.domain.as_str() {
                    TABLE_DOMAIN => self.snapshot::<TableAggregate>(cover)?,
                    _ => self.snapshot::<HandAggregate>(cover)?,
                }
            }
        }

        Ok(produced)
    }

    fn snapshot<A: Aggregate>(&mut self, cover: &Cover) -> Result<(), LogError> {
        let book = self.log.load(&cover.domain, cover.root);
        let (state, last) = rebuild_with_sequence::<A>(&book);
        if let Some(sequence) = last {
            info!(domain = %cover.domain, root = %cover.root, sequence, "snapshot saved");
            self.log.save_snapshot(
                cover,
                Snapshot {
                    sequence,
                    state: A::wrap_snapshot(state),
                },
            )?;
        }
        Ok(())
    }

    /// Восстановить процесс раздачи из журнала (после рестарта) и вернуть его под управление.
    pub fn recover_process(&mut self, table_root: Uuid, hand_root: Uuid) -> Option<&HandProcess> {
        let table_book = self.log.read(TABLE_DOMAIN, table_root, 0, None);
        let started = table_book.events().find_map(|event| match event {
            Event::Table(TableEvent::HandStarted(s)) if s.hand_root == hand_root => Some(s.clone()),
            _ => None,
        })?;
        let hand_book = self.log.read(HAND_DOMAIN, hand_root, 0, None);
        let process = HandProcess::replay(&table_book.cover, &started, &hand_book.pages);
        if process.is_complete() {
            return None;
        }
        self.flow.restore(process);
        self.flow.process(&hand_root)
    }
}
