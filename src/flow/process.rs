//! Рабочее состояние процесс-менеджера одной раздачи и его реакции на события.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::{
    AwardPot, Command, CommandBook, Cover, DealCards, DealCommunityCards, EndHand, Event,
    EventPage, HandCommand, HandEvent, HandStarted, PostBlind, TableCommand, HAND_DOMAIN,
};
use crate::domain::{
    BettingPhase, BlindType, Chips, GameVariant, HandNumber, PlayerStack, PotAward, SeatIndex,
};
use crate::engine::actions::ActionKind;
use crate::engine::betting::{community_cards_for, next_phase, BettingState};
use crate::engine::positions::next_matching;
use crate::engine::pot::{award_all, split_pot};

/// Фаза процесса раздачи (оркестрация, не путать с улицей `BettingPhase`).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HandPhase {
    #[default]
    WaitingForStart,
    Dealing,
    PostingBlinds,
    Betting,
    DealingCommunity,
    Draw,
    Showdown,
    AwardingPot,
    Complete,
}

impl HandPhase {
    /// Разрешённые переходы графа фаз.
    pub fn can_advance_to(self, next: HandPhase) -> bool {
        use HandPhase::*;
        matches!(
            (self, next),
            (WaitingForStart, Dealing)
                | (Dealing, PostingBlinds)
                | (PostingBlinds, Betting)
                | (Betting, DealingCommunity)
                | (Betting, Draw)
                | (Betting, Showdown)
                | (Betting, AwardingPot)
                | (DealingCommunity, Betting)
                | (Draw, Betting)
                | (Showdown, AwardingPot)
                | (AwardingPot, Complete)
        )
    }
}

/// Место в процессе: ставочный вид игрока плюс флаги очерёдности.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessSeat {
    pub player_root: Uuid,
    pub position: SeatIndex,
    pub stack: Chips,
    pub bet_this_round: Chips,
    pub total_invested: Chips,
    pub has_folded: bool,
    pub is_all_in: bool,
    /// Уже действовал после последнего полноценного рейза.
    pub has_acted: bool,
    pub has_drawn: bool,
}

impl ProcessSeat {
    fn from_stack(p: &PlayerStack) -> Self {
        Self {
            player_root: p.player_root,
            position: p.position,
            stack: p.stack,
            ..Self::default()
        }
    }

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

/// Состояние одной раздачи в процесс-менеджере.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HandProcess {
    pub hand_root: Uuid,
    /// Куда отправлять EndHand.
    pub table_cover: Cover,
    pub hand_cover: Cover,
    pub hand_number: HandNumber,
    pub game_variant: GameVariant,
    pub dealer_position: SeatIndex,
    pub small_blind_position: SeatIndex,
    pub big_blind_position: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub phase: HandPhase,
    pub betting: BettingState,
    pub seats: BTreeMap<SeatIndex, ProcessSeat>,
    pub pot_total: Chips,
    /// Чей ход. `None` – ходить некому (или сейчас не раунд ставок).
    pub action_on: Option<SeatIndex>,
    pub small_blind_posted: bool,
    pub big_blind_posted: bool,
    /// Ожидаемый номер следующего события потока раздачи.
    pub next_hand_sequence: u64,
    pub awards: Vec<PotAward>,
}

impl HandProcess {
    pub fn new(table_cover: &Cover, started: &HandStarted) -> Self {
        Self {
            hand_root: started.hand_root,
            table_cover: table_cover.clone(),
            hand_cover: Cover::new(
                HAND_DOMAIN,
                started.hand_root,
                table_cover.correlation_id.clone(),
            ),
            hand_number: started.hand_number,
            game_variant: started.game_variant,
            dealer_position: started.dealer_position,
            small_blind_position: started.small_blind_position,
            big_blind_position: started.big_blind_position,
            small_blind: started.small_blind,
            big_blind: started.big_blind,
            phase: HandPhase::WaitingForStart,
            betting: BettingState::new(BettingPhase::Preflop, started.big_blind),
            seats: started
                .players
                .iter()
                .map(|p| (p.position, ProcessSeat::from_stack(p)))
                .collect(),
            pot_total: Chips::ZERO,
            action_on: None,
            small_blind_posted: false,
            big_blind_posted: false,
            next_hand_sequence: 0,
            awards: Vec::new(),
        }
    }

    /// Восстановить процесс по событию старта и истории потока раздачи.
    pub fn replay(table_cover: &Cover, started: &HandStarted, hand_pages: &[EventPage]) -> Self {
        let mut process = Self::new(table_cover, started);
        process.advance(HandPhase::Dealing);
        for page in hand_pages {
            if let Event::Hand(event) = &page.event {
                process.on_hand_event(page.sequence, event);
            }
        }
        process
    }

    /// Перейти в `next`, если это ребро графа. Иначе – предупреждение, фаза не меняется.
    pub fn advance(&mut self, next: HandPhase) -> bool {
        if self.phase.can_advance_to(next) {
            debug!(hand_root = %self.hand_root, from = ?self.phase, to = ?next, "phase advance");
            self.phase = next;
            true
        } else {
            warn!(hand_root = %self.hand_root, from = ?self.phase, to = ?next, "illegal phase transition ignored");
            false
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase == HandPhase::Complete
    }

    /// Места по возрастанию.
    pub fn ring(&self) -> Vec<SeatIndex> {
        self.seats.keys().copied().collect()
    }

    pub fn seat_of(&self, player_root: &Uuid) -> Option<SeatIndex> {
        self.seats
            .values()
            .find(|s| s.player_root == *player_root)
            .map(|s| s.position)
    }

    /// Следующее место после `after`, которое может ходить (не сбросил, не all-in).
    /// Обход с переходом через ноль; само `after` проверяется последним.
    pub fn find_next_active(&self, after: SeatIndex) -> Option<SeatIndex> {
        next_matching(&self.ring(), after, |pos| {
            self.seats.get(&pos).is_some_and(ProcessSeat::is_active)
        })
    }

    /// Раунд ставок завершён:
    /// - действующих игроков не больше одного и ему нечего уравнивать, или
    /// - все действующие уже ходили и уравняли current_bet.
    pub fn is_betting_complete(&self) -> bool {
        let current_bet = self.betting.current_bet;
        let active: Vec<&ProcessSeat> = self.seats.values().filter(|s| s.is_active()).collect();
        if active.len() <= 1 {
            return active.iter().all(|s| s.bet_this_round >= current_bet);
        }
        active
            .iter()
            .all(|s| s.has_acted && s.bet_this_round >= current_bet)
    }

    /// Претенденты на банк в порядке мест.
    pub fn contenders(&self) -> Vec<&ProcessSeat> {
        self.seats.values().filter(|s| !s.has_folded).collect()
    }

    /// Фишки в игре: стеки + банк.
    pub fn chips_in_play(&self) -> Chips {
        self.seats.values().map(|s| s.stack).sum::<Chips>() + self.pot_total
    }

    fn seat_mut(&mut self, player_root: &Uuid) -> Option<&mut ProcessSeat> {
        self.seats
            .values_mut()
            .find(|s| s.player_root == *player_root)
    }

    fn hand_command(&self, command: HandCommand) -> CommandBook {
        CommandBook::single(
            self.hand_cover.clone(),
            self.next_hand_sequence,
            Command::Hand(command),
        )
    }

    /// Первая команда процесса: раздать карты.
    pub fn deal_cards_command(&self, deck_seed: Option<Vec<u8>>) -> CommandBook {
        let players = self
            .seats
            .values()
            .map(|s| PlayerStack {
                player_root: s.player_root,
                position: s.position,
                stack: s.stack,
            })
            .collect();
        self.hand_command(HandCommand::DealCards(DealCards {
            table_root: self.table_cover.root,
            hand_number: self.hand_number,
            game_variant: self.game_variant,
            dealer_position: self.dealer_position,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            players,
            deck_seed,
        }))
    }

    fn post_blind(&self, position: SeatIndex, blind_type: BlindType, amount: Chips) -> Vec<CommandBook> {
        match self.seats.get(&position) {
            Some(seat) => vec![self.hand_command(HandCommand::PostBlind(PostBlind {
                player_root: seat.player_root,
                blind_type,
                amount,
            }))],
            None => {
                warn!(hand_root = %self.hand_root, position, "blind seat is not in the hand");
                Vec::new()
            }
        }
    }

    /// Реакция на событие потока раздачи. Возвращает следующие команды.
    pub fn on_hand_event(&mut self, sequence: u64, event: &HandEvent) -> Vec<CommandBook> {
        self.next_hand_sequence = sequence + 1;

        match event {
            HandEvent::CardsDealt(_) => {
                self.advance(HandPhase::PostingBlinds);
                self.post_blind(self.small_blind_position, BlindType::Small, self.small_blind)
            }

            HandEvent::BlindPosted(e) => {
                self.put_in(&e.player_root, e.amount);
                match e.blind_type {
                    BlindType::Small => {
                        self.small_blind_posted = true;
                        self.post_blind(self.big_blind_position, BlindType::Big, self.big_blind)
                    }
                    BlindType::Big => {
                        self.big_blind_posted = true;
                        self.open_round(self.big_blind_position)
                    }
                }
            }

            HandEvent::ActionTaken(e) => self.on_action(e.player_root, e.action, e.amount),

            HandEvent::CommunityCardsDealt(e) => {
                self.reset_round(e.phase);
                self.open_round(self.dealer_position)
            }

            HandEvent::DrawStarted => {
                self.reset_round(BettingPhase::Draw);
                self.next_drawer_or_betting(self.dealer_position)
            }

            HandEvent::DrawCompleted(e) => {
                let Some(pos) = self.seat_of(&e.player_root) else {
                    return Vec::new();
                };
                if let Some(seat) = self.seats.get_mut(&pos) {
                    seat.has_drawn = true;
                }
                self.next_drawer_or_betting(pos)
            }

            HandEvent::PotAwarded(e) => {
                for award in &e.winners {
                    if let Some(seat) = self.seat_mut(&award.player_root) {
                        seat.stack += award.amount;
                    }
                    self.pot_total -= award.amount;
                }
                self.awards = e.winners.clone();
                Vec::new()
            }

            HandEvent::HandComplete(e) => {
                self.advance(HandPhase::Complete);
                self.action_on = None;
                vec![self.end_hand(e.final_stacks.clone())]
            }
        }
    }

    /// EndHand столу. Пустые final_stacks – стол освобождается без изменения стеков.
    pub fn end_hand(&self, final_stacks: Vec<PlayerStack>) -> CommandBook {
        CommandBook::single(
            self.table_cover.clone(),
            0,
            Command::Table(TableCommand::EndHand(EndHand {
                hand_root: self.hand_root,
                final_stacks,
            })),
        )
    }

    fn put_in(&mut self, player_root: &Uuid, amount: Chips) -> bool {
        let placed = self.seat_mut(player_root).map(|seat| {
            seat.put_in(amount);
            (seat.position, seat.bet_this_round)
        });
        match placed {
            Some((pos, bet)) => {
                self.pot_total += amount;
                self.betting.on_bet(pos, bet)
            }
            None => false,
        }
    }

    fn on_action(&mut self, player_root: Uuid, action: ActionKind, amount: Chips) -> Vec<CommandBook> {
        let Some(pos) = self.seat_of(&player_root) else {
            warn!(hand_root = %self.hand_root, %player_root, "action from unknown player");
            return Vec::new();
        };

        let reopened = if action == ActionKind::Fold {
            if let Some(seat) = self.seats.get_mut(&pos) {
                seat.has_folded = true;
            }
            false
        } else {
            self.put_in(&player_root, amount)
        };
        if let Some(seat) = self.seats.get_mut(&pos) {
            seat.has_acted = true;
            if action == ActionKind::AllIn {
                seat.is_all_in = true;
            }
        }
        if reopened {
            for seat in self.seats.values_mut() {
                if seat.position != pos && seat.is_active() {
                    seat.has_acted = false;
                }
            }
        }

        let remaining: Vec<Uuid> = self.contenders().iter().map(|s| s.player_root).collect();
        if let [winner] = remaining[..] {
            self.action_on = None;
            self.advance(HandPhase::AwardingPot);
            let awards = award_all(self.pot_total, winner);
            return vec![self.hand_command(HandCommand::AwardPot(AwardPot { awards }))];
        }

        if self.is_betting_complete() {
            return self.on_round_complete();
        }

        self.action_on = self.find_next_active(pos);
        Vec::new()
    }

    /// Новая улица: ставки раунда и has_acted сбрасываются.
    fn reset_round(&mut self, phase: BettingPhase) {
        for seat in self.seats.values_mut() {
            seat.bet_this_round = Chips::ZERO;
            seat.has_acted = false;
        }
        self.betting = BettingState::new(phase, self.big_blind);
    }

    /// Начать раунд ставок; если ставить некому – сразу следующая улица.
    fn open_round(&mut self, after: SeatIndex) -> Vec<CommandBook> {
        self.advance(HandPhase::Betting);
        if self.is_betting_complete() {
            return self.on_round_complete();
        }
        self.action_on = self.find_next_active(after);
        Vec::new()
    }

    fn on_round_complete(&mut self) -> Vec<CommandBook> {
        self.action_on = None;
        let next = next_phase(self.game_variant, self.betting.phase);

        match next {
            BettingPhase::Flop | BettingPhase::Turn | BettingPhase::River => {
                self.advance(HandPhase::DealingCommunity);
                let count = community_cards_for(next);
                vec![self.hand_command(HandCommand::DealCommunityCards(DealCommunityCards {
                    count,
                }))]
            }
            BettingPhase::Draw => {
                self.advance(HandPhase::Draw);
                vec![self.hand_command(HandCommand::StartDraw)]
            }
            BettingPhase::Preflop | BettingPhase::Showdown => {
                self.advance(HandPhase::Showdown);
                let contenders: Vec<Uuid> =
                    self.contenders().iter().map(|s| s.player_root).collect();
                let awards = split_pot(self.pot_total, &contenders);
                self.advance(HandPhase::AwardingPot);
                vec![self.hand_command(HandCommand::AwardPot(AwardPot { awards }))]
            }
        }
    }

    /// Следующий игрок, который ещё не менял карты.
    pub fn next_pending_drawer(&self, after: SeatIndex) -> Option<SeatIndex> {
        next_matching(&self.ring(), after, |pos| {
            self.seats
                .get(&pos)
                .is_some_and(|s| s.is_active() && !s.has_drawn)
        })
    }

    fn next_drawer_or_betting(&mut self, after: SeatIndex) -> Vec<CommandBook> {
        match self.next_pending_drawer(after) {
            Some(pos) => {
                self.action_on = Some(pos);
                Vec::new()
            }
            None => self.open_round(self.dealer_position),
        }
    }
}
