//! Агрегат раздачи: карты, блайнды, ставки, обмен, выплата банка.
//!
//! Очерёдность хода агрегат не проверяет – её ведёт процесс-менеджер.

pub mod handlers;
pub mod state;

pub use state::{HandPlayer, HandState};

use crate::api::{Command, Cover, Event, HandCommand, HandEvent, SnapshotState, HAND_DOMAIN};
use crate::engine::aggregate::{Aggregate, HandlerContext};
use crate::engine::errors::Rejection;

#[derive(Clone, Copy, Debug, Default)]
pub struct HandAggregate;

impl Aggregate for HandAggregate {
    const DOMAIN: &'static str = HAND_DOMAIN;

    type State = HandState;
    type Command = HandCommand;
    type Event = HandEvent;

    fn select_command(command: &Command) -> Option<&HandCommand> {
        match command {
            Command::Hand(c) => Some(c),
            _ => None,
        }
    }

    fn select_event(event: &Event) -> Option<&HandEvent> {
        match event {
            Event::Hand(e) => Some(e),
            _ => None,
        }
    }

    fn wrap_event(event: HandEvent) -> Event {
        Event::Hand(event)
    }

    fn select_snapshot(state: &SnapshotState) -> Option<&HandState> {
        match state {
            SnapshotState::Hand(s) => Some(s),
            _ => None,
        }
    }

    fn wrap_snapshot(state: HandState) -> SnapshotState {
        SnapshotState::Hand(state)
    }

    fn apply(state: &mut HandState, event: &HandEvent) {
        state.apply(event);
    }

    fn handle(
        &self,
        _ctx: &HandlerContext,
        _cover: &Cover,
        command: &HandCommand,
        state: &HandState,
    ) -> Result<Vec<HandEvent>, Rejection> {
        match command {
            HandCommand::DealCards(c) => handlers::deal_cards(c, state),
            HandCommand::PostBlind(c) => handlers::post_blind(c, state),
            HandCommand::PlayerAction(c) => handlers::player_action(c, state),
            HandCommand::DealCommunityCards(c) => handlers::deal_community_cards(c, state),
            HandCommand::StartDraw => handlers::start_draw(state),
            HandCommand::RequestDraw(c) => handlers::request_draw(c, state),
            HandCommand::AwardPot(c) => handlers::award_pot(c, state),
        }
    }
}
