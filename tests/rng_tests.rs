//! RNG tests for poker-hand-flow
//!
//! Эти тесты проверяют:
//! - детерминированность DeterministicRng
//! - различие seed → различие колод
//! - отсутствие повторяющихся карт
//! - доменное хэширование RngSeed (hand root → seed)
//! - работу Deck + shuffle + RandomSource

use std::collections::HashSet;

use uuid::Uuid;

use poker_hand_flow::domain::deck::Deck;
use poker_hand_flow::engine::RandomSource;
use poker_hand_flow::infra::{DeterministicRng, RngSeed, SystemRng};

fn make_u64_seed(a: u64) -> [u8; 32] {
    let mut s = [0u8; 32];
    s[..8].copy_from_slice(&a.to_le_bytes());
    s
}

//
// TEST 1 — DeterministicRng reproducibility
//
#[test]
fn deterministic_rng_same_seed_same_shuffle() {
    let mut r1 = DeterministicRng::from_seed(make_u64_seed(123));
    let mut r2 = DeterministicRng::from_seed(make_u64_seed(123));

    let mut a: Vec<u32> = (0..52).collect();
    let mut b: Vec<u32> = (0..52).collect();

    r1.shuffle(&mut a);
    r2.shuffle(&mut b);

    assert_eq!(a, b, "Same seed must produce identical shuffle");
}

//
// TEST 2 — different seeds produce different shuffle
//
#[test]
fn deterministic_rng_different_seeds_different_shuffle() {
    let mut r1 = DeterministicRng::from_u64(111);
    let mut r2 = DeterministicRng::from_u64(222);

    let mut a: Vec<u32> = (0..52).collect();
    let mut b: Vec<u32> = (0..52).collect();

    r1.shuffle(&mut a);
    r2.shuffle(&mut b);

    assert_ne!(a, b, "Different seeds must produce different shuffle");
}

//
// TEST 3 — Deck + shuffle: 52 уникальные карты
//
#[test]
fn deck_shuffle_keeps_all_cards() {
    let mut deck = Deck::standard_52();
    RngSeed::from_material(b"deck").to_rng().shuffle(&mut deck.cards);

    assert_ne!(deck, Deck::standard_52());
    let unique: HashSet<_> = deck.cards.iter().copied().collect();
    assert_eq!(unique.len(), 52);
}

//
// TEST 4 — RngSeed: одинаковый материал → одинаковый seed
//
#[test]
fn rng_seed_is_stable_per_material() {
    let hand_root = Uuid::new_v4();
    assert_eq!(RngSeed::for_hand(&hand_root), RngSeed::for_hand(&hand_root));
    assert_eq!(
        RngSeed::for_hand(&hand_root),
        RngSeed::from_material(hand_root.as_bytes())
    );
    assert_ne!(
        RngSeed::for_hand(&hand_root),
        RngSeed::for_hand(&Uuid::new_v4())
    );
}

//
// TEST 5 — seed доменно разделён: это не просто sha256(material)
//
#[test]
fn rng_seed_is_domain_separated() {
    use sha2::{Digest, Sha256};

    let material = b"hand-1";
    let plain: [u8; 32] = Sha256::digest(material).into();
    assert_ne!(RngSeed::from_material(material).bytes, plain);

    let raw = RngSeed::from_bytes(plain);
    assert_eq!(raw.bytes, plain);
}

//
// TEST 6 — seed → RNG воспроизводит колоду
//
#[test]
fn same_seed_same_deck() {
    let seed = RngSeed::from_material(b"replay");
    let mut a = Deck::standard_52();
    let mut b = Deck::standard_52();
    seed.to_rng().shuffle(&mut a.cards);
    seed.to_rng().shuffle(&mut b.cards);
    assert_eq!(a, b);
}

//
// TEST 7 — SystemRng не теряет карты
//
#[test]
fn system_rng_shuffle_is_a_permutation() {
    let mut deck = Deck::standard_52();
    SystemRng.shuffle(&mut deck.cards);
    assert_eq!(deck.len(), 52);
    let unique: HashSet<_> = deck.cards.iter().copied().collect();
    assert_eq!(unique.len(), 52);
}
