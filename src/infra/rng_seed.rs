//! RngSeed – доменный seed для тасовки колоды.
//!
//! Позволяет:
//!   - получить 32-байтовый seed из произвольных байт (например, hand root):
//!         seed = H(domain || material)
//!   - создавать DeterministicRng из seed
//!
//! Одинаковый материал даёт одинаковую колоду, поэтому раздача воспроизводима.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::infra::rng::DeterministicRng;

const DOMAIN_PREFIX: &[u8] = b"POKER_HAND_DECK_V1";

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Создать seed из 32 байт.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Доменное хэширование произвольного материала.
    pub fn from_material(material: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_PREFIX);
        hasher.update(material);
        Self {
            bytes: hasher.finalize().into(),
        }
    }

    /// Seed колоды конкретной раздачи.
    pub fn for_hand(hand_root: &Uuid) -> Self {
        Self::from_material(hand_root.as_bytes())
    }

    /// Создать DeterministicRng из seed.
    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.bytes)
    }
}
