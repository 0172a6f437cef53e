//! Проводной формат: событие/команда как `TypedPayload { type_url, value }`.
//!
//! Единственное место, где тип определяется по строке. Сопоставление идёт по
//! суффиксу URL (`.../table.HandStarted`), поэтому префикс может меняться.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::api::commands::{Command, HandCommand, TableCommand};
use crate::api::events::{Event, HandEvent, TableEvent};
use crate::api::{HAND_DOMAIN, TABLE_DOMAIN};
use crate::engine::errors::Rejection;

/// Префикс type URL для всех сообщений этого движка.
pub const TYPE_URL_PREFIX: &str = "type.poker.local/";

/// Сообщение с явным типом.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TypedPayload {
    pub type_url: String,
    pub value: Value,
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed payload for {type_url}: {source}")]
    Malformed {
        type_url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode {0}: {1}")]
    Encode(String, serde_json::Error),
}

/// Разобрать type URL в (домен, имя) по суффиксу после последнего '/'.
fn split_type_url(type_url: &str) -> Option<(&str, &str)> {
    let suffix = type_url.rsplit('/').next()?;
    let mut parts = suffix.rsplitn(3, '.');
    let name = parts.next()?;
    let domain = parts.next()?;
    Some((domain, name))
}

fn is_known(names: &[&str], name: &str) -> bool {
    names.iter().any(|n| *n == name)
}

fn type_url(domain: &str, name: &str) -> String {
    format!("{TYPE_URL_PREFIX}{domain}.{name}")
}

/// Adjacent-tagged enum -> (имя, данные). Для unit-вариантов данных нет (`Null`).
fn to_parts<T: Serialize>(value: &T, what: &str) -> Result<(String, Value), CodecError> {
    let tagged = serde_json::to_value(value).map_err(|e| CodecError::Encode(what.to_string(), e))?;
    let name = tagged
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(what)
        .to_string();
    let data = tagged.get("data").cloned().unwrap_or(Value::Null);
    Ok((name, data))
}

fn from_parts<T: for<'de> Deserialize<'de>>(name: &str, data: &Value) -> Result<T, serde_json::Error> {
    let tagged = if data.is_null() {
        json!({ "type": name })
    } else {
        json!({ "type": name, "data": data })
    };
    serde_json::from_value(tagged)
}

pub fn encode_event(event: &Event) -> Result<TypedPayload, CodecError> {
    let (domain, (name, value)) = match event {
        Event::Table(e) => (TABLE_DOMAIN, to_parts(e, e.type_name())?),
        Event::Hand(e) => (HAND_DOMAIN, to_parts(e, e.type_name())?),
        Event::Unknown { type_url } => {
            return Ok(TypedPayload {
                type_url: type_url.clone(),
                value: Value::Null,
            })
        }
    };
    Ok(TypedPayload {
        type_url: type_url(domain, &name),
        value,
    })
}

/// Неизвестный тип -> `Event::Unknown` (пропускается при пересборке).
/// Известный тип с битыми данными -> ошибка.
pub fn decode_event(payload: &TypedPayload) -> Result<Event, CodecError> {
    let unknown = || Event::Unknown {
        type_url: payload.type_url.clone(),
    };
    let Some((domain, name)) = split_type_url(&payload.type_url) else {
        return Ok(unknown());
    };

    let malformed = |source| CodecError::Malformed {
        type_url: payload.type_url.clone(),
        source,
    };

    match domain {
        TABLE_DOMAIN if is_known(TableEvent::TYPE_NAMES, name) => from_parts(name, &payload.value)
            .map(Event::Table)
            .map_err(malformed),
        HAND_DOMAIN if is_known(HandEvent::TYPE_NAMES, name) => from_parts(name, &payload.value)
            .map(Event::Hand)
            .map_err(malformed),
        _ => Ok(unknown()),
    }
}

pub fn encode_command(command: &Command) -> Result<TypedPayload, CodecError> {
    let what = command.command_type().as_str();
    let (name, value) = match command {
        Command::Table(c) => to_parts(c, what)?,
        Command::Hand(c) => to_parts(c, what)?,
    };
    Ok(TypedPayload {
        type_url: type_url(command.domain(), &name),
        value,
    })
}

/// Команду, которую не удалось распознать, отклоняем как InvalidArgument.
pub fn decode_command(payload: &TypedPayload) -> Result<Command, Rejection> {
    let (domain, name) = split_type_url(&payload.type_url)
        .ok_or_else(|| Rejection::invalid(format!("Unknown command type: {}", payload.type_url)))?;

    let decoded = match domain {
        TABLE_DOMAIN => from_parts::<TableCommand>(name, &payload.value).map(Command::Table),
        HAND_DOMAIN => from_parts::<HandCommand>(name, &payload.value).map(Command::Hand),
        _ => {
            return Err(Rejection::invalid(format!(
                "Unknown command type: {}",
                payload.type_url
            )))
        }
    };

    decoded.map_err(|e| Rejection::invalid(format!("Cannot decode {}: {e}", payload.type_url)))
}
