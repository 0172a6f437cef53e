// tests/table_aggregate_tests.rs

//! Агрегат стола: создание, посадка, старт/конец раздачи, пауза.

mod common;

use uuid::Uuid;

use poker_hand_flow::api::{
    AddChips, Command, EndHand, LeaveTable, PauseTable, SitIn, SitOut, TableCommand, TableEvent,
};
use poker_hand_flow::domain::{Chips, GameVariant, PlayerStack};
use poker_hand_flow::engine::table::hand_root_for;
use poker_hand_flow::engine::{Rejection, RejectionKind, TableAggregate, TableStatus};

use common::{create_table, join, table_cover, Stream};

fn new_table() -> (Stream<TableAggregate>, Uuid) {
    let root = Uuid::new_v4();
    let mut stream = Stream::new(TableAggregate, table_cover(root));
    stream
        .send(Command::Table(TableCommand::CreateTable(create_table(
            GameVariant::TexasHoldem,
        ))))
        .unwrap();
    (stream, root)
}

fn table(cmd: TableCommand) -> Command {
    Command::Table(cmd)
}

fn seat_players(stream: &mut Stream<TableAggregate>, n: usize) -> Vec<Uuid> {
    (0..n)
        .map(|i| {
            let p = Uuid::new_v4();
            stream.send(table(join(p, Some(i as u8), 100))).unwrap();
            p
        })
        .collect()
}

fn started(events: &poker_hand_flow::api::EventBook) -> poker_hand_flow::api::HandStarted {
    match &events.pages[0].event {
        poker_hand_flow::api::Event::Table(TableEvent::HandStarted(s)) => s.clone(),
        other => panic!("expected HandStarted, got {other:?}"),
    }
}

#[test]
fn create_table_validates_input() {
    let mut stream = Stream::new(TableAggregate, table_cover(Uuid::new_v4()));

    let mut bad = create_table(GameVariant::TexasHoldem);
    bad.table_name = "  ".to_string();
    let err = stream.send(table(TableCommand::CreateTable(bad))).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidArgument);

    let mut bad = create_table(GameVariant::TexasHoldem);
    bad.big_blind = Chips(1);
    assert!(stream.send(table(TableCommand::CreateTable(bad))).is_err());

    let mut bad = create_table(GameVariant::TexasHoldem);
    bad.max_players = 11;
    assert!(stream.send(table(TableCommand::CreateTable(bad))).is_err());

    stream
        .send(table(TableCommand::CreateTable(create_table(GameVariant::Omaha))))
        .unwrap();
    let err = stream
        .send(table(TableCommand::CreateTable(create_table(GameVariant::Omaha))))
        .unwrap_err();
    assert_eq!(err, Rejection::precondition("Table already exists"));
}

#[test]
fn commands_before_creation_are_rejected() {
    let mut stream = Stream::new(TableAggregate, table_cover(Uuid::new_v4()));
    let err = stream.send(table(join(Uuid::new_v4(), None, 100))).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);
}

#[test]
fn join_table_picks_free_seat_and_checks_limits() {
    let (mut stream, _) = new_table();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    stream.send(table(join(a, Some(0), 100))).unwrap();
    stream.send(table(join(b, None, 100))).unwrap();

    let state = stream.state();
    assert_eq!(state.seat_of(&a).map(|(pos, _)| pos), Some(0));
    assert_eq!(state.seat_of(&b).map(|(pos, _)| pos), Some(1));

    // повторная посадка
    let err = stream.send(table(join(a, None, 100))).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);

    // занятое место
    let err = stream.send(table(join(Uuid::new_v4(), Some(1), 100))).unwrap_err();
    assert_eq!(err, Rejection::precondition("Seat 1 is taken"));

    // бай-ин вне лимитов
    let err = stream.send(table(join(Uuid::new_v4(), None, 5_000))).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidArgument);

    // несуществующее место
    let err = stream.send(table(join(Uuid::new_v4(), Some(6), 100))).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidArgument);
}

#[test]
fn start_hand_requires_enough_eligible_players() {
    let (mut stream, _) = new_table();
    seat_players(&mut stream, 1);

    let err = stream.send(table(TableCommand::StartHand)).unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);
}

/// Хедз-ап: малый блайнд ставит дилер; кнопка двигается между раздачами.
#[test]
fn start_hand_heads_up_dealer_posts_small_blind() {
    let (mut stream, root) = new_table();
    seat_players(&mut stream, 2);

    let events = stream.send(table(TableCommand::StartHand)).unwrap();
    let s = started(&events);
    assert_eq!(s.hand_number, 1);
    assert_eq!(s.dealer_position, 0);
    assert_eq!(s.small_blind_position, 0);
    assert_eq!(s.big_blind_position, 1);
    assert_eq!(s.hand_root, hand_root_for(&root, 1));
    assert_eq!(s.players.len(), 2);

    let state = stream.state();
    assert_eq!(state.status, TableStatus::InHand);
    assert_eq!(state.current_hand_root, Some(s.hand_root));

    // второй StartHand во время раздачи
    let err = stream.send(table(TableCommand::StartHand)).unwrap_err();
    assert_eq!(err, Rejection::precondition("Hand already in progress"));

    stream
        .send(table(TableCommand::EndHand(EndHand {
            hand_root: s.hand_root,
            final_stacks: vec![],
        })))
        .unwrap();

    let events = stream.send(table(TableCommand::StartHand)).unwrap();
    let s2 = started(&events);
    assert_eq!(s2.hand_number, 2);
    assert_eq!(s2.dealer_position, 1);
    assert_eq!(s2.small_blind_position, 1);
    assert_eq!(s2.big_blind_position, 0);
    assert_ne!(s2.hand_root, s.hand_root);
}

#[test]
fn start_hand_three_players_blinds_follow_dealer() {
    let (mut stream, _) = new_table();
    seat_players(&mut stream, 3);

    let s = started(&stream.send(table(TableCommand::StartHand)).unwrap());
    assert_eq!(
        (s.dealer_position, s.small_blind_position, s.big_blind_position),
        (0, 1, 2)
    );
}

/// EndHand с чужим hand_root -> FailedPrecondition "Hand root mismatch".
#[test]
fn end_hand_with_wrong_root_is_rejected() {
    let (mut stream, _) = new_table();
    seat_players(&mut stream, 2);

    let err = stream
        .send(table(TableCommand::EndHand(EndHand {
            hand_root: Uuid::new_v4(),
            final_stacks: vec![],
        })))
        .unwrap_err();
    assert_eq!(err, Rejection::precondition("No hand in progress"));

    stream.send(table(TableCommand::StartHand)).unwrap();
    let err = stream
        .send(table(TableCommand::EndHand(EndHand {
            hand_root: Uuid::new_v4(),
            final_stacks: vec![],
        })))
        .unwrap_err();
    assert_eq!(err, Rejection::precondition("Hand root mismatch"));
    assert_eq!(err.to_string(), "failed precondition: Hand root mismatch");
}

#[test]
fn end_hand_replaces_stacks() {
    let (mut stream, _) = new_table();
    let players = seat_players(&mut stream, 2);
    let s = started(&stream.send(table(TableCommand::StartHand)).unwrap());

    stream
        .send(table(TableCommand::EndHand(EndHand {
            hand_root: s.hand_root,
            final_stacks: vec![
                PlayerStack { player_root: players[0], position: 0, stack: Chips(90) },
                PlayerStack { player_root: players[1], position: 1, stack: Chips(110) },
            ],
        })))
        .unwrap();

    let state = stream.state();
    assert_eq!(state.status, TableStatus::Waiting);
    assert_eq!(state.current_hand_root, None);
    assert_eq!(state.seats[&0].stack, Chips(90));
    assert_eq!(state.seats[&1].stack, Chips(110));
    assert!(state.seats.values().all(|s| !s.in_hand));
}

#[test]
fn leave_and_add_chips_are_blocked_mid_hand() {
    let (mut stream, _) = new_table();
    let players = seat_players(&mut stream, 2);
    stream.send(table(TableCommand::StartHand)).unwrap();

    let err = stream
        .send(table(TableCommand::LeaveTable(LeaveTable { player_root: players[0] })))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);

    let err = stream
        .send(table(TableCommand::AddChips(AddChips {
            player_root: players[0],
            amount: Chips(10),
        })))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);

    let err = stream
        .send(table(TableCommand::LeaveTable(LeaveTable { player_root: Uuid::new_v4() })))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::NotFound);
}

#[test]
fn sit_out_excludes_player_from_next_hand() {
    let (mut stream, _) = new_table();
    let players = seat_players(&mut stream, 3);

    stream
        .send(table(TableCommand::SitOut(SitOut { player_root: players[1] })))
        .unwrap();
    let err = stream
        .send(table(TableCommand::SitOut(SitOut { player_root: players[1] })))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::FailedPrecondition);

    let s = started(&stream.send(table(TableCommand::StartHand)).unwrap());
    assert_eq!(s.players.len(), 2);
    assert!(s.players.iter().all(|p| p.player_root != players[1]));

    stream
        .send(table(TableCommand::SitIn(SitIn { player_root: players[1] })))
        .unwrap();
    assert!(!stream.state().seats[&1].sitting_out);
}

#[test]
fn add_chips_respects_max_buy_in() {
    let (mut stream, _) = new_table();
    let players = seat_players(&mut stream, 1);

    stream
        .send(table(TableCommand::AddChips(AddChips {
            player_root: players[0],
            amount: Chips(400),
        })))
        .unwrap();
    assert_eq!(stream.state().seats[&0].stack, Chips(500));

    let err = stream
        .send(table(TableCommand::AddChips(AddChips {
            player_root: players[0],
            amount: Chips(501),
        })))
        .unwrap_err();
    assert_eq!(err.kind(), RejectionKind::InvalidArgument);
}

#[test]
fn pause_and_resume() {
    let (mut stream, _) = new_table();
    seat_players(&mut stream, 2);

    let err = stream.send(table(TableCommand::ResumeTable)).unwrap_err();
    assert_eq!(err, Rejection::precondition("Table is not paused"));

    stream
        .send(table(TableCommand::PauseTable(PauseTable { reason: "break".into() })))
        .unwrap();
    assert_eq!(stream.state().status, TableStatus::Paused);

    let err = stream.send(table(TableCommand::StartHand)).unwrap_err();
    assert_eq!(err, Rejection::precondition("Table is paused"));

    stream.send(table(TableCommand::ResumeTable)).unwrap();
    assert_eq!(stream.state().status, TableStatus::Waiting);
    stream.send(table(TableCommand::StartHand)).unwrap();
}

#[test]
fn leave_table_cashes_out() {
    let (mut stream, _) = new_table();
    let players = seat_players(&mut stream, 2);

    let events = stream
        .send(table(TableCommand::LeaveTable(LeaveTable { player_root: players[1] })))
        .unwrap();
    match &events.pages[0].event {
        poker_hand_flow::api::Event::Table(TableEvent::PlayerLeft(e)) => {
            assert_eq!(e.seat_position, 1);
            assert_eq!(e.chips_cashed_out, Chips(100));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(stream.state().seats.len(), 1);
}
