//! Обработчики команд раздачи: guard -> validate -> compute -> события.

use std::collections::BTreeSet;

use crate::api::{
    ActionTaken, AwardPot, BlindPosted, CardsDealt, CommunityCardsDealt, DealCards,
    DealCommunityCards, DrawCompleted, HandComplete, HandEvent, PlayerAction, PostBlind,
    PotAwarded, RequestDraw,
};
use crate::domain::{BettingPhase, Card, Deck, PlayerHoleCards, SeatIndex};
use crate::engine::betting::{community_cards_for, is_betting_phase, next_phase};
use crate::engine::errors::Rejection;
use crate::engine::hand::state::{HandPlayer, HandState};
use crate::engine::pot::reconcile_awards;
use crate::engine::validation::resolve_action;
use crate::engine::RandomSource;
use crate::infra::rng::SystemRng;
use crate::infra::rng_seed::RngSeed;

/// Общий guard: карты розданы, раздача не завершена.
fn require_live(state: &HandState) -> Result<(), Rejection> {
    if !state.dealt {
        return Err(Rejection::precondition("Cards have not been dealt"));
    }
    if state.complete {
        return Err(Rejection::precondition("Hand is complete"));
    }
    Ok(())
}

fn require_player<'a>(
    state: &'a HandState,
    player_root: &uuid::Uuid,
) -> Result<&'a HandPlayer, Rejection> {
    let player = state
        .player(player_root)
        .ok_or_else(|| Rejection::not_found(format!("Player {player_root} is not in this hand")))?;
    if player.has_folded {
        return Err(Rejection::precondition("Player has folded"));
    }
    Ok(player)
}

/// Порядок раздачи карт: по кругу, начиная слева от дилера.
fn deal_order(positions: &[SeatIndex], dealer: SeatIndex) -> Vec<SeatIndex> {
    let start = positions.partition_point(|&p| p <= dealer);
    positions[start..]
        .iter()
        .chain(positions[..start].iter())
        .copied()
        .collect()
}

fn shuffled_deck(seed: Option<&[u8]>) -> Deck {
    let mut deck = Deck::standard_52();
    match seed {
        Some(material) => RngSeed::from_material(material)
            .to_rng()
            .shuffle(&mut deck.cards),
        None => SystemRng.shuffle(&mut deck.cards),
    }
    deck
}

pub fn deal_cards(cmd: &DealCards, state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    if state.dealt {
        return Err(Rejection::precondition("Cards already dealt"));
    }

    if cmd.players.len() < 2 {
        return Err(Rejection::invalid("At least 2 players are required"));
    }
    let positions: BTreeSet<SeatIndex> = cmd.players.iter().map(|p| p.position).collect();
    if positions.len() != cmd.players.len() {
        return Err(Rejection::invalid("Duplicate seat position"));
    }
    let roots: BTreeSet<_> = cmd.players.iter().map(|p| p.player_root).collect();
    if roots.len() != cmd.players.len() {
        return Err(Rejection::invalid("Duplicate player"));
    }
    if cmd.players.iter().any(|p| p.stack.is_zero()) {
        return Err(Rejection::invalid("Player stack must be positive"));
    }

    let per_player = cmd.game_variant.hole_cards_per_player();
    let order = deal_order(&positions.into_iter().collect::<Vec<_>>(), cmd.dealer_position);

    let mut deck = shuffled_deck(cmd.deck_seed.as_deref());
    let dealt = deck
        .draw_n(per_player * order.len())
        .ok_or_else(|| Rejection::invalid("Not enough cards for this many players"))?;

    // карта i уходит игроку order[i % n]: по одной за круг
    let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(per_player); order.len()];
    for (i, card) in dealt.into_iter().enumerate() {
        hands[i % order.len()].push(card);
    }

    let mut hole_cards: Vec<PlayerHoleCards> = order
        .iter()
        .zip(hands)
        .filter_map(|(pos, cards)| {
            cmd.players
                .iter()
                .find(|p| p.position == *pos)
                .map(|p| PlayerHoleCards {
                    player_root: p.player_root,
                    position: *pos,
                    cards,
                })
        })
        .collect();
    hole_cards.sort_by_key(|h| h.position);

    let mut players = cmd.players.clone();
    players.sort_by_key(|p| p.position);

    Ok(vec![HandEvent::CardsDealt(CardsDealt {
        table_root: cmd.table_root,
        hand_number: cmd.hand_number,
        game_variant: cmd.game_variant,
        dealer_position: cmd.dealer_position,
        small_blind: cmd.small_blind,
        big_blind: cmd.big_blind,
        players,
        hole_cards,
        remaining_deck: deck.cards,
    })])
}

pub fn post_blind(cmd: &PostBlind, state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;
    if state.phase() != BettingPhase::Preflop {
        return Err(Rejection::precondition("Blinds are posted preflop only"));
    }

    let player = require_player(state, &cmd.player_root)?;
    if cmd.amount.is_zero() {
        return Err(Rejection::invalid("Blind amount must be positive"));
    }
    if player.stack.is_zero() {
        return Err(Rejection::precondition("Player has no chips"));
    }

    let amount = cmd.amount.min(player.stack);
    Ok(vec![HandEvent::BlindPosted(BlindPosted {
        player_root: cmd.player_root,
        blind_type: cmd.blind_type,
        amount,
        player_stack: player.stack - amount,
        pot_total: state.pot_total + amount,
    })])
}

pub fn player_action(cmd: &PlayerAction, state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;
    if !is_betting_phase(state.phase()) {
        return Err(Rejection::precondition("Betting is closed"));
    }
    if state.phase() == BettingPhase::Preflop && !state.big_blind_posted {
        return Err(Rejection::precondition("Blinds have not been posted"));
    }
    if state.phase() == BettingPhase::Draw && state.draw_pending() {
        return Err(Rejection::precondition("Draw is still in progress"));
    }

    let player = require_player(state, &cmd.player_root)?;
    if player.is_all_in {
        return Err(Rejection::precondition("Player is all-in"));
    }

    let resolved = resolve_action(player, cmd.action, cmd.amount, &state.betting, state.big_blind)?;

    Ok(vec![HandEvent::ActionTaken(ActionTaken {
        player_root: cmd.player_root,
        action: resolved.action,
        amount: resolved.amount,
        player_stack: player.stack - resolved.amount,
        pot_total: state.pot_total + resolved.amount,
    })])
}

pub fn deal_community_cards(
    cmd: &DealCommunityCards,
    state: &HandState,
) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;
    if !state.game_variant.has_community_cards() {
        return Err(Rejection::precondition("This variant has no community cards"));
    }
    if !matches!(
        state.phase(),
        BettingPhase::Preflop | BettingPhase::Flop | BettingPhase::Turn
    ) {
        return Err(Rejection::precondition("All community cards are already dealt"));
    }

    let phase = next_phase(state.game_variant, state.phase());
    let expected = community_cards_for(phase);
    if cmd.count != expected {
        return Err(Rejection::invalid(format!(
            "Expected {expected} community cards, got {}",
            cmd.count
        )));
    }

    let mut deck = Deck::from_cards(state.deck.clone());
    let cards = deck
        .draw_n(usize::from(cmd.count))
        .ok_or_else(|| Rejection::invalid("Not enough cards in deck"))?;

    let mut all_community_cards = state.community_cards.clone();
    all_community_cards.extend(cards.iter().copied());

    Ok(vec![HandEvent::CommunityCardsDealt(CommunityCardsDealt {
        cards,
        phase,
        all_community_cards,
    })])
}

pub fn start_draw(state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;
    if !state.game_variant.has_draw() {
        return Err(Rejection::precondition("This variant has no draw"));
    }
    if state.phase() != BettingPhase::Preflop {
        return Err(Rejection::precondition("Draw starts after preflop betting"));
    }
    Ok(vec![HandEvent::DrawStarted])
}

pub fn request_draw(cmd: &RequestDraw, state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;
    if state.phase() != BettingPhase::Draw {
        return Err(Rejection::precondition("Not in the draw phase"));
    }

    let player = require_player(state, &cmd.player_root)?;
    if player.has_drawn {
        return Err(Rejection::precondition("Player has already drawn"));
    }

    let mut seen = BTreeSet::new();
    for &i in &cmd.discard_indices {
        if usize::from(i) >= player.hole_cards.len() {
            return Err(Rejection::invalid(format!("Discard index {i} out of range")));
        }
        if !seen.insert(i) {
            return Err(Rejection::invalid(format!("Duplicate discard index {i}")));
        }
    }

    let discarded: Vec<Card> = seen
        .iter()
        .map(|&i| player.hole_cards[usize::from(i)])
        .collect();
    let mut deck = Deck::from_cards(state.deck.clone());
    let new_cards = deck
        .draw_n(discarded.len())
        .ok_or_else(|| Rejection::invalid("Not enough cards in deck"))?;

    Ok(vec![HandEvent::DrawCompleted(DrawCompleted {
        player_root: cmd.player_root,
        discarded,
        new_cards,
    })])
}

pub fn award_pot(cmd: &AwardPot, state: &HandState) -> Result<Vec<HandEvent>, Rejection> {
    require_live(state)?;

    if cmd.awards.is_empty() {
        return Err(Rejection::invalid("At least one award is required"));
    }
    for award in &cmd.awards {
        let winner = state.player(&award.player_root).ok_or_else(|| {
            Rejection::not_found(format!("Winner {} is not in this hand", award.player_root))
        })?;
        if winner.has_folded {
            return Err(Rejection::invalid(format!(
                "Winner {} has folded",
                award.player_root
            )));
        }
    }

    let winners = reconcile_awards(cmd.awards.clone(), state.pot_total)?;
    let pot_awarded = PotAwarded {
        winners: winners.clone(),
        pot_total: state.pot_total,
    };

    let mut after = state.clone();
    after.apply(&HandEvent::PotAwarded(pot_awarded.clone()));

    Ok(vec![
        HandEvent::PotAwarded(pot_awarded),
        HandEvent::HandComplete(HandComplete {
            table_root: state.table_root,
            hand_number: state.hand_number,
            winners,
            final_stacks: after.final_stacks(),
        }),
    ])
}
