use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::TableEvent;
use crate::domain::{Chips, GameVariant, HandNumber, Seat, SeatIndex};

/// Статус стола между раздачами.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TableStatus {
    #[default]
    Waiting,
    InHand,
    Paused,
}

/// Состояние агрегата стола.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TableState {
    /// `TableCreated` уже применено.
    pub created: bool,
    pub table_name: String,
    pub game_variant: GameVariant,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub min_buy_in: Chips,
    pub max_buy_in: Chips,
    pub max_players: u8,
    /// Занятые места по номеру.
    pub seats: BTreeMap<SeatIndex, Seat>,
    /// Кнопка последней раздачи.
    pub dealer_position: Option<SeatIndex>,
    pub hand_count: HandNumber,
    pub current_hand_root: Option<Uuid>,
    pub status: TableStatus,
}

impl TableState {
    pub fn seat_of(&self, player_root: &Uuid) -> Option<(SeatIndex, &Seat)> {
        self.seats
            .iter()
            .find(|(_, seat)| seat.player_root == *player_root)
            .map(|(pos, seat)| (*pos, seat))
    }

    /// Места, которые попадут в следующую раздачу (по возрастанию).
    pub fn eligible_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .filter(|(_, seat)| seat.is_eligible())
            .map(|(pos, _)| *pos)
            .collect()
    }

    /// Первое свободное место.
    pub fn first_free_seat(&self) -> Option<SeatIndex> {
        (0..self.max_players).find(|pos| !self.seats.contains_key(pos))
    }

    pub fn apply(&mut self, event: &TableEvent) {
        match event {
            TableEvent::TableCreated(e) => {
                self.created = true;
                self.table_name = e.table_name.clone();
                self.game_variant = e.game_variant;
                self.small_blind = e.small_blind;
                self.big_blind = e.big_blind;
                self.min_buy_in = e.min_buy_in;
                self.max_buy_in = e.max_buy_in;
                self.max_players = e.max_players;
                self.status = TableStatus::Waiting;
            }
            TableEvent::PlayerJoined(e) => {
                self.seats
                    .insert(e.seat_position, Seat::new(e.player_root, e.stack));
            }
            TableEvent::PlayerLeft(e) => {
                self.seats.remove(&e.seat_position);
            }
            TableEvent::PlayerSatOut(e) => self.set_sitting_out(&e.player_root, true),
            TableEvent::PlayerSatIn(e) => self.set_sitting_out(&e.player_root, false),
            TableEvent::ChipsAdded(e) => {
                if let Some(seat) = self.seat_mut(&e.player_root) {
                    seat.stack = e.new_stack;
                }
            }
            TableEvent::TablePaused(_) => self.status = TableStatus::Paused,
            TableEvent::TableResumed => self.status = TableStatus::Waiting,
            TableEvent::HandStarted(e) => {
                self.hand_count = e.hand_number;
                self.dealer_position = Some(e.dealer_position);
                self.current_hand_root = Some(e.hand_root);
                self.status = TableStatus::InHand;
                for p in &e.players {
                    if let Some(seat) = self.seats.get_mut(&p.position) {
                        seat.in_hand = true;
                    }
                }
            }
            TableEvent::HandEnded(e) => {
                for p in &e.final_stacks {
                    if let Some(seat) = self.seats.get_mut(&p.position) {
                        if seat.player_root == p.player_root {
                            seat.stack = p.stack;
                        }
                    }
                }
                for seat in self.seats.values_mut() {
                    seat.in_hand = false;
                }
                self.current_hand_root = None;
                self.status = TableStatus::Waiting;
            }
        }
    }

    fn seat_mut(&mut self, player_root: &Uuid) -> Option<&mut Seat> {
        self.seats
            .values_mut()
            .find(|seat| seat.player_root == *player_root)
    }

    fn set_sitting_out(&mut self, player_root: &Uuid, sitting_out: bool) {
        if let Some(seat) = self.seat_mut(player_root) {
            seat.sitting_out = sitting_out;
        }
    }
}
