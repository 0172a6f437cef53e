//! Агрегат стола: места, стеки, кнопка, жизненный цикл раздач.

pub mod handlers;
pub mod state;

pub use handlers::hand_root_for;
pub use state::{TableState, TableStatus};

use crate::api::{Command, Cover, Event, SnapshotState, TableCommand, TableEvent, TABLE_DOMAIN};
use crate::engine::aggregate::{Aggregate, HandlerContext};
use crate::engine::errors::Rejection;

#[derive(Clone, Copy, Debug, Default)]
pub struct TableAggregate;

impl Aggregate for TableAggregate {
    const DOMAIN: &'static str = TABLE_DOMAIN;

    type State = TableState;
    type Command = TableCommand;
    type Event = TableEvent;

    fn select_command(command: &Command) -> Option<&TableCommand> {
        match command {
            Command::Table(c) => Some(c),
            _ => None,
        }
    }

    fn select_event(event: &Event) -> Option<&TableEvent> {
        match event {
            Event::Table(e) => Some(e),
            _ => None,
        }
    }

    fn wrap_event(event: TableEvent) -> Event {
        Event::Table(event)
    }

    fn select_snapshot(state: &SnapshotState) -> Option<&TableState> {
        match state {
            SnapshotState::Table(s) => Some(s),
            _ => None,
        }
    }

    fn wrap_snapshot(state: TableState) -> SnapshotState {
        SnapshotState::Table(state)
    }

    fn apply(state: &mut TableState, event: &TableEvent) {
        state.apply(event);
    }

    fn handle(
        &self,
        ctx: &HandlerContext,
        cover: &Cover,
        command: &TableCommand,
        state: &TableState,
    ) -> Result<Vec<TableEvent>, Rejection> {
        match command {
            TableCommand::CreateTable(c) => handlers::create_table(ctx, c, state),
            TableCommand::JoinTable(c) => handlers::join_table(c, state),
            TableCommand::LeaveTable(c) => handlers::leave_table(c, state),
            TableCommand::SitOut(c) => handlers::sit_out(c, state),
            TableCommand::SitIn(c) => handlers::sit_in(c, state),
            TableCommand::AddChips(c) => handlers::add_chips(c, state),
            TableCommand::PauseTable(c) => handlers::pause_table(c, state),
            TableCommand::ResumeTable => handlers::resume_table(state),
            TableCommand::StartHand => handlers::start_hand(ctx, &cover.root, state),
            TableCommand::EndHand(c) => handlers::end_hand(c, state),
        }
    }
}
