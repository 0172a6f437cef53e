use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::BettingPhase;
use crate::domain::variant::GameVariant;
use crate::domain::SeatIndex;

/// Состояние раунда ставок (на конкретной улице).
///
/// Общее для агрегата раздачи и процесс-менеджера: оба ведут его по одним
/// и тем же событиям и потому видят одинаковые current_bet / min_raise.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Улица, к которой относится этот раунд.
    pub phase: BettingPhase,
    /// Текущая целевая ставка, до которой должны дотянуться игроки (BB, bet, raise).
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Seat последнего агрессора (bet/raise/all-in сверх ставки).
    pub last_aggressor: Option<SeatIndex>,
}

impl BettingState {
    /// Новый раунд: ставки нет, минимальный рейз – большой блайнд.
    pub fn new(phase: BettingPhase, min_raise: Chips) -> Self {
        Self {
            phase,
            current_bet: Chips::ZERO,
            min_raise,
            last_aggressor: None,
        }
    }

    /// Обновить состояние после того, как у игрока на `seat` ставка выросла до `new_bet`:
    /// - если new_bet выше current_bet – это новая целевая ставка;
    /// - если прирост не меньше min_raise – это полноценный рейз: min_raise = прирост,
    ///   seat становится агрессором, раунд переоткрывается (возвращаем true).
    ///
    /// Неполный рейз (только all-in) поднимает current_bet, но раунд не переоткрывает.
    pub fn on_bet(&mut self, seat: SeatIndex, new_bet: Chips) -> bool {
        if new_bet <= self.current_bet {
            return false;
        }
        let increment = new_bet - self.current_bet;
        self.current_bet = new_bet;
        if increment >= self.min_raise {
            self.min_raise = increment;
            self.last_aggressor = Some(seat);
            true
        } else {
            false
        }
    }

    /// Сколько игроку с `bet_this_round` нужно добавить, чтобы уравнять.
    pub fn to_call(&self, bet_this_round: Chips) -> Chips {
        self.current_bet.saturating_sub(bet_this_round)
    }
}

/// Следующая улица после завершения раунда ставок.
///
/// Hold'em/Omaha: Preflop → Flop → Turn → River → Showdown.
/// Five Card Draw: Preflop → Draw → Showdown (раунд ставок после обмена идёт в фазе Draw).
pub fn next_phase(variant: GameVariant, phase: BettingPhase) -> BettingPhase {
    if variant.has_draw() {
        return match phase {
            BettingPhase::Preflop => BettingPhase::Draw,
            _ => BettingPhase::Showdown,
        };
    }
    match phase {
        BettingPhase::Preflop => BettingPhase::Flop,
        BettingPhase::Flop => BettingPhase::Turn,
        BettingPhase::Turn => BettingPhase::River,
        BettingPhase::River | BettingPhase::Draw | BettingPhase::Showdown => BettingPhase::Showdown,
    }
}

/// Сколько общих карт открывается при переходе на улицу.
pub fn community_cards_for(phase: BettingPhase) -> u8 {
    match phase {
        BettingPhase::Flop => 3,
        BettingPhase::Turn | BettingPhase::River => 1,
        _ => 0,
    }
}

/// Фаза, в которой идут ставки (а не шоудаун).
pub fn is_betting_phase(phase: BettingPhase) -> bool {
    !matches!(phase, BettingPhase::Showdown)
}
