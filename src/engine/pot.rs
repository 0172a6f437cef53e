use uuid::Uuid;

use crate::domain::chips::Chips;
use crate::domain::hand::PotAward;
use crate::engine::errors::Rejection;

/// Поровну разделить банк между претендентами (в порядке мест).
///
/// Остаток от деления раздаётся по одной фишке первым претендентам:
/// 100 на троих -> 34/33/33.
pub fn split_pot(pot: Chips, contenders: &[Uuid]) -> Vec<PotAward> {
    if contenders.is_empty() {
        return Vec::new();
    }
    let n = contenders.len() as u64;
    let share = pot.0 / n;
    let remainder = pot.0 % n;

    contenders
        .iter()
        .enumerate()
        .map(|(i, player_root)| PotAward {
            player_root: *player_root,
            amount: Chips(share + u64::from((i as u64) < remainder)),
        })
        .collect()
}

/// Весь банк одному игроку (все остальные сбросили).
pub fn award_all(pot: Chips, player_root: Uuid) -> Vec<PotAward> {
    vec![PotAward {
        player_root,
        amount: pot,
    }]
}

/// Привести выплаты к размеру банка: разница (в любую сторону) ложится
/// на первую выплату. Если первая выплата ушла бы в минус – отказ.
pub fn reconcile_awards(mut awards: Vec<PotAward>, pot: Chips) -> Result<Vec<PotAward>, Rejection> {
    let total: i128 = awards.iter().map(|a| i128::from(a.amount.0)).sum();
    let diff = i128::from(pot.0) - total;
    if diff == 0 {
        return Ok(awards);
    }

    let first = awards
        .first_mut()
        .ok_or_else(|| Rejection::invalid("No awards"))?;
    let adjusted = i128::from(first.amount.0) + diff;
    if adjusted < 0 {
        return Err(Rejection::invalid("Awards exceed pot"));
    }
    first.amount = Chips(u64::try_from(adjusted).map_err(|_| Rejection::invalid("Award overflow"))?);
    Ok(awards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_first_contenders() {
        let players: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let amounts: Vec<u64> = split_pot(Chips(100), &players)
            .iter()
            .map(|a| a.amount.0)
            .collect();
        assert_eq!(amounts, vec![34, 33, 33]);
    }

    #[test]
    fn reconcile_moves_difference_to_first() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let awards = vec![
            PotAward { player_root: a, amount: Chips(10) },
            PotAward { player_root: b, amount: Chips(10) },
        ];
        let fixed = reconcile_awards(awards.clone(), Chips(25)).unwrap();
        assert_eq!(fixed[0].amount, Chips(15));

        let err = reconcile_awards(awards, Chips(5)).unwrap_err();
        assert_eq!(err, Rejection::invalid("Awards exceed pot"));
    }
}
