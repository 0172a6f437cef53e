use tracing::trace;

use crate::api::EventBook;
use crate::engine::aggregate::Aggregate;

/// Пересобрать состояние агрегата из книги событий.
///
/// Старт – снапшот, если он относится к этому агрегату, иначе `Default`.
/// Страницы с номером не больше уже применённого пропускаются, поэтому
/// снапшот на k + хвост даёт то же, что полная история.
pub fn rebuild<A: Aggregate>(book: &EventBook) -> A::State {
    rebuild_with_sequence::<A>(book).0
}

/// То же, что `rebuild`, плюс номер последнего применённого события.
pub fn rebuild_with_sequence<A: Aggregate>(book: &EventBook) -> (A::State, Option<u64>) {
    let from_snapshot = book.snapshot.as_ref().and_then(|snapshot| {
        A::select_snapshot(&snapshot.state).map(|state| (state.clone(), snapshot.sequence))
    });

    let (mut state, mut last) = match from_snapshot {
        Some((state, sequence)) => (state, Some(sequence)),
        None => (A::State::default(), None),
    };

    for page in &book.pages {
        if last.is_some_and(|l| page.sequence <= l) {
            continue;
        }
        match A::select_event(&page.event) {
            Some(event) => A::apply(&mut state, event),
            None => trace!(
                domain = A::DOMAIN,
                sequence = page.sequence,
                event = page.event.type_name(),
                "skipping foreign event"
            ),
        }
        last = Some(page.sequence);
    }

    (state, last)
}
