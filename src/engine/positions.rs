use crate::domain::SeatIndex;

/// Найти следующее место по кругу после `after`, для которого выполняется `pred`.
///
/// `ring` – занятые места по возрастанию. Обход идёт вперёд с переходом через
/// ноль ровно один раз; место `after` (если оно в кольце) проверяется последним.
pub fn next_matching<F>(ring: &[SeatIndex], after: SeatIndex, pred: F) -> Option<SeatIndex>
where
    F: Fn(SeatIndex) -> bool,
{
    let start = ring.partition_point(|&s| s <= after);
    ring[start..]
        .iter()
        .chain(ring[..start].iter())
        .copied()
        .find(|&s| pred(s))
}

/// Следующее место в кольце после `after` (без фильтра).
pub fn next_seat(ring: &[SeatIndex], after: SeatIndex) -> Option<SeatIndex> {
    next_matching(ring, after, |_| true)
}

/// Предложить следующую позицию дилера среди `eligible`:
/// - если кнопка уже была – следующее место после неё;
/// - если нет – первое место.
pub fn next_dealer(eligible: &[SeatIndex], current: Option<SeatIndex>) -> Option<SeatIndex> {
    match current {
        Some(button) => next_seat(eligible, button),
        None => eligible.first().copied(),
    }
}

/// Места блайндов для дилера `dealer`.
///
/// Хедз-ап: малый блайнд ставит дилер. Иначе – два следующих места после кнопки.
pub fn blind_positions(eligible: &[SeatIndex], dealer: SeatIndex) -> Option<(SeatIndex, SeatIndex)> {
    let small = if eligible.len() == 2 {
        dealer
    } else {
        next_seat(eligible, dealer)?
    };
    let big = next_seat(eligible, small)?;
    Some((small, big))
}
