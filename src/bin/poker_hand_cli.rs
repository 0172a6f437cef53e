// src/bin/poker_hand_cli.rs
//
// Играет несколько раздач через локальный координатор и печатает итог.
// Использование: poker_hand_cli [holdem|omaha|draw] [игроков] [раздач] [config.json]
// Подробный лог: RUST_LOG=poker_hand_flow=debug

use std::env;
use std::fs;
use std::process::ExitCode;

use uuid::Uuid;

use poker_hand_flow::api::{
    Command, CommandBook, Cover, CreateTable, HandCommand, JoinTable, PlayerAction, RequestDraw,
    TableCommand, HAND_DOMAIN, TABLE_DOMAIN,
};
use poker_hand_flow::domain::{Chips, GameVariant};
use poker_hand_flow::engine::ActionKind;
use poker_hand_flow::flow::HandPhase;
use poker_hand_flow::infra::{EngineConfig, LocalRuntime, RuntimeError};

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "poker_hand_flow=info".into()),
        )
        .init();
}

fn parse_variant(s: &str) -> Option<GameVariant> {
    match s {
        "holdem" => Some(GameVariant::TexasHoldem),
        "omaha" => Some(GameVariant::Omaha),
        "draw" => Some(GameVariant::FiveCardDraw),
        _ => None,
    }
}

fn table_command(root: Uuid, correlation_id: &str, command: TableCommand) -> CommandBook {
    CommandBook::single(
        Cover::new(TABLE_DOMAIN, root, correlation_id),
        0,
        Command::Table(command),
    )
}

fn hand_command(root: Uuid, correlation_id: &str, command: HandCommand) -> CommandBook {
    CommandBook::single(
        Cover::new(HAND_DOMAIN, root, correlation_id),
        0,
        Command::Hand(command),
    )
}

/// Пассивная стратегия: check, если можно, иначе call. В обмене меняем одну карту.
fn play_hand(runtime: &mut LocalRuntime, hand_root: Uuid) -> Result<usize, RuntimeError> {
    let correlation_id = hand_root.to_string();
    let mut steps = 0;

    while let Some(process) = runtime.flow().process(&hand_root) {
        let Some(seat) = process.action_on else {
            break;
        };
        let Some(player_root) = process.seats.get(&seat).map(|s| s.player_root) else {
            break;
        };

        let command = if process.phase == HandPhase::Draw {
            HandCommand::RequestDraw(RequestDraw {
                player_root,
                discard_indices: vec![0],
            })
        } else {
            let hand = runtime.hand_state(hand_root);
            let to_call = hand
                .player(&player_root)
                .map_or(Chips::ZERO, |p| hand.betting.to_call(p.bet_this_round));
            let action = if to_call.is_zero() {
                ActionKind::Check
            } else {
                ActionKind::Call
            };
            HandCommand::PlayerAction(PlayerAction {
                player_root,
                action,
                amount: Chips::ZERO,
            })
        };

        runtime.submit(hand_command(hand_root, &correlation_id, command))?;
        steps += 1;
    }

    Ok(steps)
}

fn run(args: &[String]) -> Result<(), String> {
    let variant = match args.get(1) {
        Some(s) => parse_variant(s).ok_or_else(|| format!("неизвестный вариант: {s}"))?,
        None => GameVariant::TexasHoldem,
    };
    let num_players: u8 = args
        .get(2)
        .map(|s| s.parse().map_err(|_| format!("неверное число игроков: {s}")))
        .transpose()?
        .unwrap_or(4);
    let num_hands: u32 = args
        .get(3)
        .map(|s| s.parse().map_err(|_| format!("неверное число раздач: {s}")))
        .transpose()?
        .unwrap_or(3);
    let config = match args.get(4) {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            EngineConfig::from_json(&json).map_err(|e| e.to_string())?
        }
        None => EngineConfig {
            seeded_decks: true,
            ..EngineConfig::default()
        },
    };

    println!("poker_hand_cli: {variant:?}, игроков: {num_players}, раздач: {num_hands}");

    let mut runtime = LocalRuntime::new(config);
    let table_root = Uuid::new_v4();
    let correlation_id = table_root.to_string();

    runtime
        .submit(table_command(
            table_root,
            &correlation_id,
            TableCommand::CreateTable(CreateTable {
                table_name: "CLI TABLE".to_string(),
                game_variant: variant,
                small_blind: Chips(50),
                big_blind: Chips(100),
                min_buy_in: Chips(1_000),
                max_buy_in: Chips(20_000),
                max_players: num_players.max(2),
            }),
        ))
        .map_err(|e| e.to_string())?;

    for _ in 0..num_players {
        runtime
            .submit(table_command(
                table_root,
                &correlation_id,
                TableCommand::JoinTable(JoinTable {
                    player_root: Uuid::new_v4(),
                    preferred_seat: None,
                    buy_in_amount: Chips(10_000),
                }),
            ))
            .map_err(|e| e.to_string())?;
    }

    for n in 1..=num_hands {
        if let Err(e) = runtime.submit(table_command(table_root, &correlation_id, TableCommand::StartHand)) {
            println!("раздача {n} не началась: {e}");
            break;
        }
        let Some(hand_root) = runtime.table_state(table_root).current_hand_root else {
            println!("раздача {n} завершилась сразу");
            continue;
        };

        let steps = play_hand(&mut runtime, hand_root).map_err(|e| e.to_string())?;
        let hand = runtime.hand_state(hand_root);
        let board: Vec<String> = hand.community_cards.iter().map(|c| c.to_string()).collect();
        println!(
            "раздача #{n}: {steps} ходов, борд [{}], банк выплачен: {}",
            board.join(" "),
            hand.complete
        );
    }

    let table = runtime.table_state(table_root);
    println!("================ ИТОГ =================");
    for (pos, seat) in &table.seats {
        println!("  место {pos}: {} фишек", seat.stack);
    }
    let total: Chips = table.seats.values().map(|s| s.stack).sum();
    println!("  всего: {total}");
    if !runtime.rejections().is_empty() {
        println!("  отклонённых команд процесса: {}", runtime.rejections().len());
    }

    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();
    let args: Vec<String> = env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ошибка: {e}");
            ExitCode::FAILURE
        }
    }
}
