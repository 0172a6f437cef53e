//! Компенсации: реакция на отказ агрегата выполнить команду процесса.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::{CommandBook, CommandType, Cover};

/// Кто выдал отклонённую команду.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IssuerType {
    Saga,
    ProcessManager,
}

/// Уведомление об отказе, доставляемое выдавшему команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RejectionNotification {
    pub issuer_name: String,
    pub issuer_type: IssuerType,
    /// Номер события, в ответ на которое была выдана команда.
    pub source_event_sequence: u64,
    pub rejection_reason: String,
    pub rejected_command: Option<CommandBook>,
    /// Поток, чьё событие породило команду.
    pub source_aggregate_cover: Option<Cover>,
}

impl RejectionNotification {
    /// Ключ маршрутизации: (домен, тип) отклонённой команды.
    pub fn route_key(&self) -> Option<(String, CommandType)> {
        let book = self.rejected_command.as_ref()?;
        Some((book.cover.domain.clone(), book.command_type()?))
    }
}

/// Обработчик компенсации: по уведомлению и контексту выдавшего – компенсирующие команды.
pub type CompensationHandler<C> = fn(&RejectionNotification, &C) -> Vec<CommandBook>;

/// Таблица компенсаций по (domain, CommandType). Строится один раз при создании.
pub struct CompensationRouter<C> {
    handlers: HashMap<(String, CommandType), CompensationHandler<C>>,
}

impl<C> Default for CompensationRouter<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> CompensationRouter<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, domain: &str, command_type: CommandType, handler: CompensationHandler<C>) -> Self {
        self.handlers
            .insert((domain.to_string(), command_type), handler);
        self
    }

    pub fn handles(&self, domain: &str, command_type: CommandType) -> bool {
        self.handlers
            .contains_key(&(domain.to_string(), command_type))
    }

    /// Нет обработчика – не ошибка, просто пустой результат.
    pub fn dispatch(&self, notification: &RejectionNotification, context: &C) -> Vec<CommandBook> {
        let Some(key) = notification.route_key() else {
            debug!(issuer = %notification.issuer_name, "rejection without command, nothing to compensate");
            return Vec::new();
        };

        match self.handlers.get(&key) {
            Some(handler) => {
                let commands = handler(notification, context);
                info!(
                    issuer = %notification.issuer_name,
                    domain = %key.0,
                    command = %key.1,
                    reason = %notification.rejection_reason,
                    compensations = commands.len(),
                    "compensating rejected command"
                );
                commands
            }
            None => {
                debug!(domain = %key.0, command = %key.1, "no compensation handler");
                Vec::new()
            }
        }
    }
}
