// tests/codec_tests.rs

//! Проводной формат: type URL, неизвестные типы, битые данные, команды.

mod common;

use serde_json::json;
use uuid::Uuid;

use poker_hand_flow::api::codec::TYPE_URL_PREFIX;
use poker_hand_flow::api::{
    decode_command, decode_event, encode_command, encode_event, CodecError, Command, Event,
    HandCommand, HandEvent, PauseTable, PlayerSatOut, TableCommand, TableEvent, TypedPayload,
};
use poker_hand_flow::domain::{Chips, GameVariant};
use poker_hand_flow::engine::{ActionKind, RejectionKind};

use common::{create_table, player_stacks};

#[test]
fn event_type_url_names_domain_and_type() {
    let root = Uuid::new_v4();
    let event = Event::Table(TableEvent::PlayerSatOut(PlayerSatOut { player_root: root }));

    let payload = encode_event(&event).unwrap();
    assert_eq!(payload.type_url, format!("{TYPE_URL_PREFIX}table.PlayerSatOut"));
    assert_eq!(payload.value, json!({ "player_root": root.to_string() }));

    assert_eq!(decode_event(&payload).unwrap(), event);
}

/// Unit-варианты кодируются без данных.
#[test]
fn unit_events_have_null_payload() {
    let payload = encode_event(&Event::Hand(HandEvent::DrawStarted)).unwrap();
    assert_eq!(payload.type_url, format!("{TYPE_URL_PREFIX}hand.DrawStarted"));
    assert!(payload.value.is_null());
    assert_eq!(
        decode_event(&payload).unwrap(),
        Event::Hand(HandEvent::DrawStarted)
    );
}

/// Сопоставление по суффиксу: префикс может быть любым.
#[test]
fn decoding_ignores_url_prefix() {
    let payload = TypedPayload {
        type_url: "example.com/poker/table.TablePaused".to_string(),
        value: json!({ "reason": "maintenance" }),
    };
    match decode_event(&payload).unwrap() {
        Event::Table(TableEvent::TablePaused(p)) => assert_eq!(p.reason, "maintenance"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_event_types_decode_as_unknown() {
    for url in [
        "type.poker.local/table.TableRenamed",
        "type.poker.local/tournament.LevelUp",
        "garbage",
    ] {
        let payload = TypedPayload {
            type_url: url.to_string(),
            value: json!({}),
        };
        assert_eq!(
            decode_event(&payload).unwrap(),
            Event::Unknown {
                type_url: url.to_string()
            }
        );
    }

    // Unknown кодируется обратно с исходным URL
    let unknown = Event::Unknown {
        type_url: "type.poker.local/hand.Future".to_string(),
    };
    assert_eq!(encode_event(&unknown).unwrap().type_url, "type.poker.local/hand.Future");
}

#[test]
fn known_event_with_bad_payload_is_an_error() {
    let payload = TypedPayload {
        type_url: format!("{TYPE_URL_PREFIX}table.ChipsAdded"),
        value: json!({ "player_root": "not-a-uuid" }),
    };
    let err = decode_event(&payload).unwrap_err();
    assert!(matches!(err, CodecError::Malformed { ref type_url, .. } if type_url.ends_with("ChipsAdded")));
}

#[test]
fn commands_survive_the_wire() {
    let commands = vec![
        Command::Table(TableCommand::CreateTable(create_table(GameVariant::Omaha))),
        Command::Table(TableCommand::PauseTable(PauseTable {
            reason: "break".to_string(),
        })),
        Command::Table(TableCommand::StartHand),
        Command::Hand(HandCommand::DealCards(common::deal_cards(
            GameVariant::FiveCardDraw,
            &player_stacks(&[10, 20, 30]),
        ))),
        Command::Hand(HandCommand::PlayerAction(poker_hand_flow::api::PlayerAction {
            player_root: Uuid::new_v4(),
            action: ActionKind::Raise,
            amount: Chips(40),
        })),
        Command::Hand(HandCommand::StartDraw),
    ];

    for command in commands {
        let payload = encode_command(&command).unwrap();
        assert!(payload
            .type_url
            .ends_with(&format!(".{}", command.command_type())));
        assert!(payload.type_url.contains(command.domain()));
        assert_eq!(decode_command(&payload).unwrap(), command);
    }
}

#[test]
fn bad_commands_are_invalid_argument() {
    let unknown_domain = TypedPayload {
        type_url: format!("{TYPE_URL_PREFIX}lobby.JoinQueue"),
        value: json!({}),
    };
    let err = decode_command(&unknown_domain).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidArgument);

    let unknown_type = TypedPayload {
        type_url: format!("{TYPE_URL_PREFIX}hand.Shuffle"),
        value: json!({}),
    };
    assert_eq!(
        decode_command(&unknown_type).unwrap_err().kind(),
        RejectionKind::InvalidArgument
    );

    let malformed = TypedPayload {
        type_url: format!("{TYPE_URL_PREFIX}hand.PostBlind"),
        value: json!({ "amount": -1 }),
    };
    assert_eq!(
        decode_command(&malformed).unwrap_err().kind(),
        RejectionKind::InvalidArgument
    );
}
