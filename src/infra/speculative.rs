//! What-if выполнение: тот же конвейер handle + rebuild, но на копиях состояния.
//! Ничего не пишет в журнал и не трогает живые процессы.

use crate::api::{CommandBook, Event, EventBook};
use crate::engine::aggregate::{Aggregate, HandlerContext};
use crate::engine::errors::Rejection;
use crate::engine::rebuild::rebuild;
use crate::engine::router::CommandRouter;
use crate::flow::process::HandProcess;
use crate::infra::config::EngineConfig;

/// Результат пробного выполнения команды.
#[derive(Clone, Debug)]
pub struct SpeculativeOutcome<S> {
    /// События, которые были бы записаны.
    pub events: EventBook,
    /// Состояние агрегата после них.
    pub state: S,
}

#[derive(Clone, Debug, Default)]
pub struct SpeculativeExecutor {
    config: EngineConfig,
}

impl SpeculativeExecutor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Выполнить команду против копии истории.
    pub fn execute<A: Aggregate>(
        &self,
        router: &CommandRouter<A>,
        command: &CommandBook,
        prior: &EventBook,
    ) -> Result<SpeculativeOutcome<A::State>, Rejection> {
        let ctx = HandlerContext::new(self.config.clone());
        let events = router.dispatch(&ctx, command, prior)?;

        let mut merged = prior.clone();
        merged.pages.extend(events.pages.iter().cloned());
        let state = rebuild::<A>(&merged);

        Ok(SpeculativeOutcome { events, state })
    }

    /// Как отреагировал бы процесс раздачи на эти события (на копии процесса).
    pub fn react(&self, process: &HandProcess, book: &EventBook) -> (HandProcess, Vec<CommandBook>) {
        let mut copy = process.clone();
        let mut commands = Vec::new();
        for page in &book.pages {
            if let Event::Hand(event) = &page.event {
                commands.extend(copy.on_hand_event(page.sequence, event));
            }
        }
        (copy, commands)
    }
}
