use tracing::{debug, warn};

use crate::api::{CommandBook, EventBook, EventPage};
use crate::engine::aggregate::{Aggregate, HandlerContext};
use crate::engine::errors::Rejection;
use crate::engine::rebuild::rebuild;

/// Маршрутизатор команд одного агрегата: (CommandBook, история) -> новые события.
///
/// Ничего не хранит: история приходит снаружи, результат уходит наружу.
#[derive(Clone, Debug, Default)]
pub struct CommandRouter<A: Aggregate> {
    aggregate: A,
}

impl<A: Aggregate> CommandRouter<A> {
    pub fn new(aggregate: A) -> Self {
        Self { aggregate }
    }

    pub fn domain(&self) -> &'static str {
        A::DOMAIN
    }

    /// Выполнить все страницы книги по порядку.
    ///
    /// Между страницами события применяются к состоянию, так что вторая
    /// команда видит результат первой. Номера новых страниц продолжают
    /// историю без пропусков.
    pub fn dispatch(
        &self,
        ctx: &HandlerContext,
        command: &CommandBook,
        prior: &EventBook,
    ) -> Result<EventBook, Rejection> {
        let cover = &command.cover;
        if cover.domain != A::DOMAIN {
            return Err(Rejection::invalid(format!(
                "Command for domain {} routed to {}",
                cover.domain,
                A::DOMAIN
            )));
        }
        if prior.cover.root != cover.root || prior.cover.domain != cover.domain {
            return Err(Rejection::invalid("Event book does not match command cover"));
        }
        if command.pages.is_empty() {
            return Err(Rejection::invalid("Command book has no pages"));
        }

        let mut state = rebuild::<A>(prior);
        let mut sequence = prior.next_sequence();
        let mut out = EventBook::new(cover.clone());

        for page in &command.pages {
            let Some(cmd) = A::select_command(&page.command) else {
                return Err(Rejection::invalid(format!(
                    "{} is not a {} command",
                    page.command.command_type(),
                    A::DOMAIN
                )));
            };

            let events = match self.aggregate.handle(ctx, cover, cmd, &state) {
                Ok(events) => events,
                Err(rejection) => {
                    warn!(
                        domain = A::DOMAIN,
                        root = %cover.root,
                        command = %page.command.command_type(),
                        correlation_id = %ctx.correlation_id,
                        %rejection,
                        "command rejected"
                    );
                    return Err(rejection);
                }
            };

            for event in events {
                A::apply(&mut state, &event);
                out.pages.push(EventPage {
                    sequence,
                    event: A::wrap_event(event),
                    created_at: ctx.now,
                });
                sequence += 1;
            }
        }

        debug!(
            domain = A::DOMAIN,
            root = %cover.root,
            events = out.pages.len(),
            next_sequence = sequence,
            "command accepted"
        );
        Ok(out)
    }
}
