use serde::{Deserialize, Serialize};

/// Вариант игры. От него зависят карманные карты, наличие борда и обмен.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameVariant {
    #[default]
    TexasHoldem,
    Omaha,
    FiveCardDraw,
}

impl GameVariant {
    /// Сколько карманных карт получает каждый игрок.
    pub fn hole_cards_per_player(self) -> usize {
        match self {
            GameVariant::TexasHoldem => 2,
            GameVariant::Omaha => 4,
            GameVariant::FiveCardDraw => 5,
        }
    }

    pub fn has_community_cards(self) -> bool {
        matches!(self, GameVariant::TexasHoldem | GameVariant::Omaha)
    }

    pub fn has_draw(self) -> bool {
        matches!(self, GameVariant::FiveCardDraw)
    }
}
