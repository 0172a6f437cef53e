use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::HandEvent;
use crate::domain::{
    BettingPhase, BlindType, Card, Chips, Deck, GameVariant, HandNumber, PlayerStack, SeatIndex,
};
use crate::engine::actions::ActionKind;
use crate::engine::betting::BettingState;

/// Игрок внутри раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandPlayer {
    pub player_root: Uuid,
    pub position: SeatIndex,
    /// Фишки за столом, ещё не поставленные в банк.
    pub stack: Chips,
    pub hole_cards: Vec<Card>,
    /// Поставлено на текущей улице.
    pub bet_this_round: Chips,
    /// Поставлено за всю раздачу.
    pub total_invested: Chips,
    pub has_folded: bool,
    pub is_all_in: bool,
    pub has_drawn: bool,
}

impl HandPlayer {
    /// Может ещё действовать: не сбросил и не в all-in.
    pub fn is_active(&self) -> bool {
        !self.has_folded && !self.is_all_in
    }

    fn put_in(&mut self, amount: Chips) {
        self.stack -= amount;
        self.bet_this_round += amount;
        self.total_invested += amount;
        if self.stack.is_zero() {
            self.is_all_in = true;
        }
    }
}

/// Состояние агрегата раздачи.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HandState {
    pub dealt: bool,
    pub complete: bool,
    pub table_root: Uuid,
    pub hand_number: HandNumber,
    pub game_variant: GameVariant,
    pub dealer_position: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub players: BTreeMap<SeatIndex, HandPlayer>,
    pub community_cards: Vec<Card>,
    /// Оставшаяся колода, верх – конец вектора.
    pub deck: Vec<Card>,
    pub betting: BettingState,
    pub pot_total: Chips,
    /// Большой блайнд поставлен: до этого префлоп-действия запрещены.
    pub big_blind_posted: bool,
}

impl HandState {
    pub fn phase(&self) -> BettingPhase {
        self.betting.phase
    }

    pub fn player(&self, player_root: &Uuid) -> Option<&HandPlayer> {
        self.players.values().find(|p| p.player_root == *player_root)
    }

    fn player_mut(&mut self, player_root: &Uuid) -> Option<&mut HandPlayer> {
        self.players
            .values_mut()
            .find(|p| p.player_root == *player_root)
    }

    /// Игроки, претендующие на банк (не сбросили), по порядку мест.
    pub fn contenders(&self) -> impl Iterator<Item = &HandPlayer> {
        self.players.values().filter(|p| !p.has_folded)
    }

    /// Кто-то из действующих игроков ещё не поменял карты.
    pub fn draw_pending(&self) -> bool {
        self.players.values().any(|p| p.is_active() && !p.has_drawn)
    }

    /// Фишки в игре: стеки + банк. Постоянно в пределах раздачи.
    pub fn chips_in_play(&self) -> Chips {
        self.players.values().map(|p| p.stack).sum::<Chips>() + self.pot_total
    }

    pub fn final_stacks(&self) -> Vec<PlayerStack> {
        self.players
            .values()
            .map(|p| PlayerStack {
                player_root: p.player_root,
                position: p.position,
                stack: p.stack,
            })
            .collect()
    }

    /// Новая улица: ставки раунда обнуляются, минимальный рейз – большой блайнд.
    fn start_round(&mut self, phase: BettingPhase) {
        for p in self.players.values_mut() {
            p.bet_this_round = Chips::ZERO;
        }
        self.betting = BettingState::new(phase, self.big_blind);
    }

    /// Игрок добавляет фишки в банк; рост его ставки может поднять current_bet.
    fn bet(&mut self, player_root: &Uuid, amount: Chips) {
        let placed = self.player_mut(player_root).map(|p| {
            p.put_in(amount);
            (p.position, p.bet_this_round)
        });
        if let Some((seat, bet)) = placed {
            self.betting.on_bet(seat, bet);
            self.pot_total += amount;
        }
    }

    fn take_from_deck(&mut self, cards: &[Card]) {
        let mut deck = Deck::from_cards(std::mem::take(&mut self.deck));
        deck.remove_cards(cards);
        self.deck = deck.cards;
    }

    pub fn apply(&mut self, event: &HandEvent) {
        match event {
            HandEvent::CardsDealt(e) => {
                self.dealt = true;
                self.complete = false;
                self.table_root = e.table_root;
                self.hand_number = e.hand_number;
                self.game_variant = e.game_variant;
                self.dealer_position = e.dealer_position;
                self.small_blind = e.small_blind;
                self.big_blind = e.big_blind;
                self.players = e
                    .players
                    .iter()
                    .map(|p| {
                        let hole_cards = e
                            .hole_cards
                            .iter()
                            .find(|h| h.position == p.position)
                            .map(|h| h.cards.clone())
                            .unwrap_or_default();
                        let player = HandPlayer {
                            player_root: p.player_root,
                            position: p.position,
                            stack: p.stack,
                            hole_cards,
                            ..HandPlayer::default()
                        };
                        (p.position, player)
                    })
                    .collect();
                self.community_cards.clear();
                self.deck = e.remaining_deck.clone();
                self.pot_total = Chips::ZERO;
                self.big_blind_posted = false;
                self.betting = BettingState::new(BettingPhase::Preflop, e.big_blind);
            }
            HandEvent::BlindPosted(e) => {
                if e.blind_type == BlindType::Big {
                    self.big_blind_posted = true;
                }
                self.bet(&e.player_root, e.amount);
            }
            HandEvent::ActionTaken(e) => {
                if e.action == ActionKind::Fold {
                    if let Some(p) = self.player_mut(&e.player_root) {
                        p.has_folded = true;
                    }
                } else {
                    self.bet(&e.player_root, e.amount);
                }
            }
            HandEvent::CommunityCardsDealt(e) => {
                self.community_cards.extend(e.cards.iter().copied());
                self.take_from_deck(&e.cards);
                self.start_round(e.phase);
            }
            HandEvent::DrawStarted => self.start_round(BettingPhase::Draw),
            HandEvent::DrawCompleted(e) => {
                if let Some(p) = self.player_mut(&e.player_root) {
                    p.hole_cards.retain(|c| !e.discarded.contains(c));
                    p.hole_cards.extend(e.new_cards.iter().copied());
                    p.has_drawn = true;
                }
                self.take_from_deck(&e.new_cards);
            }
            HandEvent::PotAwarded(e) => {
                for award in &e.winners {
                    if let Some(p) = self.player_mut(&award.player_root) {
                        p.stack += award.amount;
                    }
                    self.pot_total -= award.amount;
                }
                self.betting.phase = BettingPhase::Showdown;
            }
            HandEvent::HandComplete(_) => self.complete = true,
        }
    }
}
