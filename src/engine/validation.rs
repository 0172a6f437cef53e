use crate::domain::chips::Chips;
use crate::engine::actions::ActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::Rejection;
use crate::engine::hand::HandPlayer;

/// Действие после проверки: итоговый тип (с учётом all-in) и реально добавленные фишки.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedAction {
    pub action: ActionKind,
    pub amount: Chips,
}

/// Проверить действие игрока при текущем состоянии ставок и посчитать, сколько он платит.
///
/// `amount` – фишки, которые игрок добавляет (для Bet/Raise). Для Call сумма
/// считается сама: min(to_call, stack). Действие, опустошающее стек,
/// перетегируется в AllIn.
pub fn resolve_action(
    player: &HandPlayer,
    action: ActionKind,
    amount: Chips,
    betting: &BettingState,
    big_blind: Chips,
) -> Result<ResolvedAction, Rejection> {
    let stack = player.stack;
    let to_call = betting.to_call(player.bet_this_round);

    let pay = match action {
        ActionKind::Fold => Chips::ZERO,

        ActionKind::Check => {
            if !to_call.is_zero() {
                return Err(Rejection::precondition(format!(
                    "Cannot check, {to_call} to call"
                )));
            }
            Chips::ZERO
        }

        ActionKind::Call => {
            if to_call.is_zero() {
                return Err(Rejection::precondition("Nothing to call"));
            }
            to_call.min(stack)
        }

        ActionKind::Bet => {
            if !betting.current_bet.is_zero() {
                return Err(Rejection::precondition("Cannot bet when there is a bet, use raise"));
            }
            if amount.is_zero() {
                return Err(Rejection::invalid("Bet amount must be positive"));
            }
            let pay = amount.min(stack);
            if pay < big_blind && pay < stack {
                return Err(Rejection::invalid(format!("Bet must be at least {big_blind}")));
            }
            pay
        }

        ActionKind::Raise => {
            if betting.current_bet.is_zero() {
                return Err(Rejection::precondition("Cannot raise without a bet, use bet"));
            }
            if amount.is_zero() {
                return Err(Rejection::invalid("Raise amount must be positive"));
            }
            let pay = amount.min(stack);
            let increment = (player.bet_this_round + pay).saturating_sub(betting.current_bet);
            if increment < betting.min_raise && pay < stack {
                return Err(Rejection::invalid(format!(
                    "Raise must be at least {}",
                    betting.min_raise
                )));
            }
            pay
        }

        ActionKind::AllIn => {
            if stack.is_zero() {
                return Err(Rejection::precondition("No chips to go all-in"));
            }
            stack
        }
    };

    let action = if action != ActionKind::Fold && !pay.is_zero() && pay == stack {
        ActionKind::AllIn
    } else {
        action
    };

    Ok(ResolvedAction { action, amount: pay })
}
