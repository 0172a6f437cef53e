//! Обработчики команд стола: guard -> validate -> compute -> событие.

use uuid::Uuid;

use crate::api::{
    AddChips, ChipsAdded, CreateTable, EndHand, HandEnded, HandStarted, JoinTable, LeaveTable,
    PauseTable, PlayerJoined, PlayerLeft, PlayerSatIn, PlayerSatOut, SitIn, SitOut, TableCreated,
    TableEvent, TablePaused,
};
use crate::domain::{PlayerStack, Seat, SeatIndex};
use crate::engine::aggregate::HandlerContext;
use crate::engine::errors::Rejection;
use crate::engine::positions::{blind_positions, next_dealer};
use crate::engine::table::state::{TableState, TableStatus};

/// Корень раздачи выводится из корня стола и номера раздачи (UUIDv5),
/// поэтому повторная обработка StartHand даёт тот же адрес.
pub fn hand_root_for(table_root: &Uuid, hand_number: u64) -> Uuid {
    Uuid::new_v5(table_root, format!("hand-{hand_number}").as_bytes())
}

fn require_table(state: &TableState) -> Result<(), Rejection> {
    if state.created {
        Ok(())
    } else {
        Err(Rejection::precondition("Table does not exist"))
    }
}

fn require_seated<'a>(
    state: &'a TableState,
    player_root: &Uuid,
) -> Result<(SeatIndex, &'a Seat), Rejection> {
    state
        .seat_of(player_root)
        .ok_or_else(|| Rejection::not_found(format!("Player {player_root} is not seated")))
}

fn mid_hand(state: &TableState, seat: &Seat) -> bool {
    state.status == TableStatus::InHand && seat.in_hand
}

pub fn create_table(
    ctx: &HandlerContext,
    cmd: &CreateTable,
    state: &TableState,
) -> Result<Vec<TableEvent>, Rejection> {
    if state.created {
        return Err(Rejection::precondition("Table already exists"));
    }

    if cmd.table_name.trim().is_empty() {
        return Err(Rejection::invalid("Table name is required"));
    }
    if cmd.small_blind.is_zero() {
        return Err(Rejection::invalid("Small blind must be positive"));
    }
    if cmd.big_blind < cmd.small_blind {
        return Err(Rejection::invalid("Big blind must be at least the small blind"));
    }
    if cmd.min_buy_in.is_zero() || cmd.min_buy_in > cmd.max_buy_in {
        return Err(Rejection::invalid(
            "Minimum buy-in must be positive and not above the maximum",
        ));
    }
    let max_seats = ctx.config.max_seats;
    if cmd.max_players < 2 || cmd.max_players > max_seats {
        return Err(Rejection::invalid(format!(
            "Max players must be between 2 and {max_seats}"
        )));
    }

    Ok(vec![TableEvent::TableCreated(TableCreated {
        table_name: cmd.table_name.trim().to_string(),
        game_variant: cmd.game_variant,
        small_blind: cmd.small_blind,
        big_blind: cmd.big_blind,
        min_buy_in: cmd.min_buy_in,
        max_buy_in: cmd.max_buy_in,
        max_players: cmd.max_players,
    })])
}

pub fn join_table(cmd: &JoinTable, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;

    if state.seat_of(&cmd.player_root).is_some() {
        return Err(Rejection::precondition("Player already seated"));
    }
    if cmd.buy_in_amount < state.min_buy_in || cmd.buy_in_amount > state.max_buy_in {
        return Err(Rejection::invalid(format!(
            "Buy-in must be between {} and {}",
            state.min_buy_in, state.max_buy_in
        )));
    }

    let seat_position = match cmd.preferred_seat {
        Some(pos) if pos >= state.max_players => {
            return Err(Rejection::invalid(format!("Seat {pos} does not exist")));
        }
        Some(pos) if state.seats.contains_key(&pos) => {
            return Err(Rejection::precondition(format!("Seat {pos} is taken")));
        }
        Some(pos) => pos,
        None => state
            .first_free_seat()
            .ok_or_else(|| Rejection::precondition("Table is full"))?,
    };

    Ok(vec![TableEvent::PlayerJoined(PlayerJoined {
        player_root: cmd.player_root,
        seat_position,
        stack: cmd.buy_in_amount,
    })])
}

pub fn leave_table(cmd: &LeaveTable, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    let (seat_position, seat) = require_seated(state, &cmd.player_root)?;
    if mid_hand(state, seat) {
        return Err(Rejection::precondition("Player is in the current hand"));
    }

    Ok(vec![TableEvent::PlayerLeft(PlayerLeft {
        player_root: cmd.player_root,
        seat_position,
        chips_cashed_out: seat.stack,
    })])
}

pub fn sit_out(cmd: &SitOut, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    let (_, seat) = require_seated(state, &cmd.player_root)?;
    if seat.sitting_out {
        return Err(Rejection::precondition("Player is already sitting out"));
    }
    Ok(vec![TableEvent::PlayerSatOut(PlayerSatOut {
        player_root: cmd.player_root,
    })])
}

pub fn sit_in(cmd: &SitIn, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    let (_, seat) = require_seated(state, &cmd.player_root)?;
    if !seat.sitting_out {
        return Err(Rejection::precondition("Player is not sitting out"));
    }
    Ok(vec![TableEvent::PlayerSatIn(PlayerSatIn {
        player_root: cmd.player_root,
    })])
}

pub fn add_chips(cmd: &AddChips, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    let (_, seat) = require_seated(state, &cmd.player_root)?;
    if mid_hand(state, seat) {
        return Err(Rejection::precondition("Cannot add chips during a hand"));
    }
    if cmd.amount.is_zero() {
        return Err(Rejection::invalid("Amount must be positive"));
    }
    let new_stack = seat.stack + cmd.amount;
    if new_stack > state.max_buy_in {
        return Err(Rejection::invalid(format!(
            "Stack would exceed maximum buy-in {}",
            state.max_buy_in
        )));
    }

    Ok(vec![TableEvent::ChipsAdded(ChipsAdded {
        player_root: cmd.player_root,
        amount: cmd.amount,
        new_stack,
    })])
}

pub fn pause_table(cmd: &PauseTable, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    if state.status != TableStatus::Waiting {
        return Err(Rejection::precondition("Table can only be paused between hands"));
    }
    Ok(vec![TableEvent::TablePaused(TablePaused {
        reason: cmd.reason.clone(),
    })])
}

pub fn resume_table(state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    if state.status != TableStatus::Paused {
        return Err(Rejection::precondition("Table is not paused"));
    }
    Ok(vec![TableEvent::TableResumed])
}

pub fn start_hand(
    ctx: &HandlerContext,
    table_root: &Uuid,
    state: &TableState,
) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    match state.status {
        TableStatus::Waiting => {}
        TableStatus::InHand => return Err(Rejection::precondition("Hand already in progress")),
        TableStatus::Paused => return Err(Rejection::precondition("Table is paused")),
    }

    let eligible = state.eligible_seats();
    let needed = ctx.config.min_players_to_start.max(2);
    if eligible.len() < needed {
        return Err(Rejection::precondition(format!(
            "Not enough players to start a hand: {} of {needed}",
            eligible.len()
        )));
    }

    let dealer = next_dealer(&eligible, state.dealer_position)
        .ok_or_else(|| Rejection::precondition("No dealer position available"))?;
    let (small, big) = blind_positions(&eligible, dealer)
        .ok_or_else(|| Rejection::precondition("Cannot place blinds"))?;

    let hand_number = state.hand_count + 1;
    let players = eligible
        .iter()
        .filter_map(|pos| {
            state.seats.get(pos).map(|seat| PlayerStack {
                player_root: seat.player_root,
                position: *pos,
                stack: seat.stack,
            })
        })
        .collect();

    Ok(vec![TableEvent::HandStarted(HandStarted {
        hand_root: hand_root_for(table_root, hand_number),
        hand_number,
        game_variant: state.game_variant,
        dealer_position: dealer,
        small_blind_position: small,
        big_blind_position: big,
        small_blind: state.small_blind,
        big_blind: state.big_blind,
        players,
    })])
}

pub fn end_hand(cmd: &EndHand, state: &TableState) -> Result<Vec<TableEvent>, Rejection> {
    require_table(state)?;
    if state.status != TableStatus::InHand {
        return Err(Rejection::precondition("No hand in progress"));
    }
    if state.current_hand_root != Some(cmd.hand_root) {
        return Err(Rejection::precondition("Hand root mismatch"));
    }

    for p in &cmd.final_stacks {
        let seated = state
            .seats
            .get(&p.position)
            .is_some_and(|seat| seat.player_root == p.player_root);
        if !seated {
            return Err(Rejection::not_found(format!(
                "Player {} is not seated at {}",
                p.player_root, p.position
            )));
        }
    }

    Ok(vec![TableEvent::HandEnded(HandEnded {
        hand_root: cmd.hand_root,
        final_stacks: cmd.final_stacks.clone(),
    })])
}
