// tests/common/mod.rs

//! Общие хелперы интеграционных тестов: обложки, команды, "поток" агрегата в памяти.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use poker_hand_flow::api::{
    Command, CommandBook, Cover, CreateTable, DealCards, EventBook, HandCommand, JoinTable,
    TableCommand, HAND_DOMAIN, TABLE_DOMAIN,
};
use poker_hand_flow::domain::{Chips, GameVariant, PlayerStack, SeatIndex};
use poker_hand_flow::engine::{rebuild, Aggregate, CommandRouter, HandlerContext, Rejection};
use poker_hand_flow::infra::{EngineConfig, LocalRuntime};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid timestamp")
}

pub fn ctx() -> HandlerContext {
    HandlerContext::at(fixed_now(), "test", EngineConfig::default())
}

pub fn seeded_config() -> EngineConfig {
    EngineConfig {
        seeded_decks: true,
        ..EngineConfig::default()
    }
}

pub fn table_cover(root: Uuid) -> Cover {
    Cover::new(TABLE_DOMAIN, root, "test")
}

pub fn hand_cover(root: Uuid) -> Cover {
    Cover::new(HAND_DOMAIN, root, "test")
}

pub fn table_cmd(root: Uuid, command: TableCommand) -> CommandBook {
    CommandBook::single(table_cover(root), 0, Command::Table(command))
}

pub fn hand_cmd(root: Uuid, command: HandCommand) -> CommandBook {
    CommandBook::single(hand_cover(root), 0, Command::Hand(command))
}

/// Стол 5/10, бай-ин 10..1000, до 6 игроков.
pub fn create_table(variant: GameVariant) -> CreateTable {
    CreateTable {
        table_name: "Test table".to_string(),
        game_variant: variant,
        small_blind: Chips(5),
        big_blind: Chips(10),
        min_buy_in: Chips(10),
        max_buy_in: Chips(1_000),
        max_players: 6,
    }
}

pub fn join(player_root: Uuid, seat: Option<SeatIndex>, buy_in: u64) -> TableCommand {
    TableCommand::JoinTable(JoinTable {
        player_root,
        preferred_seat: seat,
        buy_in_amount: Chips(buy_in),
    })
}

/// Игроки на местах 0..n с заданными стеками.
pub fn player_stacks(stacks: &[u64]) -> Vec<PlayerStack> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, stack)| PlayerStack {
            player_root: Uuid::new_v4(),
            position: i as SeatIndex,
            stack: Chips(*stack),
        })
        .collect()
}

/// DealCards: дилер на последнем месте, блайнды 5/10, детерминированная колода.
pub fn deal_cards(variant: GameVariant, players: &[PlayerStack]) -> DealCards {
    DealCards {
        table_root: Uuid::new_v4(),
        hand_number: 1,
        game_variant: variant,
        dealer_position: players.last().map_or(0, |p| p.position),
        small_blind: Chips(5),
        big_blind: Chips(10),
        players: players.to_vec(),
        deck_seed: Some(b"test-deck".to_vec()),
    }
}

/// Поток одного агрегата в памяти: команды выполняются через роутер,
/// события копятся в книге.
pub struct Stream<A: Aggregate> {
    pub router: CommandRouter<A>,
    pub book: EventBook,
    pub ctx: HandlerContext,
}

impl<A: Aggregate> Stream<A> {
    pub fn new(aggregate: A, cover: Cover) -> Self {
        Self {
            router: CommandRouter::new(aggregate),
            book: EventBook::new(cover),
            ctx: ctx(),
        }
    }

    pub fn send(&mut self, command: Command) -> Result<EventBook, Rejection> {
        let book = CommandBook::single(self.book.cover.clone(), self.book.next_sequence(), command);
        let produced = self.router.dispatch(&self.ctx, &book, &self.book)?;
        self.book.pages.extend(produced.pages.iter().cloned());
        Ok(produced)
    }

    pub fn state(&self) -> A::State {
        rebuild::<A>(&self.book)
    }
}

/// Координатор с созданным столом и рассаженными игроками (места 0..n).
pub fn runtime_with_table(
    config: EngineConfig,
    variant: GameVariant,
    stacks: &[u64],
) -> (LocalRuntime, Uuid, Vec<Uuid>) {
    let mut runtime = LocalRuntime::new(config).with_fixed_time(fixed_now());
    let table_root = Uuid::new_v4();
    runtime
        .submit(table_cmd(table_root, TableCommand::CreateTable(create_table(variant))))
        .expect("create table");

    let players: Vec<Uuid> = stacks.iter().map(|_| Uuid::new_v4()).collect();
    for (i, (player, stack)) in players.iter().zip(stacks).enumerate() {
        runtime
            .submit(table_cmd(table_root, join(*player, Some(i as SeatIndex), *stack)))
            .expect("join table");
    }
    (runtime, table_root, players)
}
