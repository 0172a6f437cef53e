//! Доменная модель: карты, колода, фишки, варианты игры, места за столом.
//!
//! Здесь только значения без логики команд/событий – её держат агрегаты в `engine`.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod variant;

/// Номер места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Порядковый номер раздачи за столом (1, 2, 3, ...).
pub type HandNumber = u64;

pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use variant::*;
