//! terrain.rs：
//! - 定義地形種類與其固定修正表（防禦、射程、移動成本）。
//! - 地形在棋盤建立時決定，之後不可變。
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, Display, EnumIter, PartialEq, Eq, Hash,
)]
pub enum TerrainKind {
    #[default]
    Flat,
    HighGround,
    LowGround,
    Trenches,
}

/// 地形修正值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainModifier {
    pub defense_bonus: i32,
    pub range_bonus: i32,
    /// 移動只檢查距離，這個值僅提供給狀態編碼器等外部使用
    pub movement_cost: i32,
}

const FLAT: TerrainModifier = TerrainModifier {
    defense_bonus: 0,
    range_bonus: 0,
    movement_cost: 0,
};
const HIGH_GROUND: TerrainModifier = TerrainModifier {
    defense_bonus: 1,
    range_bonus: 1,
    movement_cost: 0,
};
// 低地本身不加防禦，額外的 -1 在傷害計算時套用
const LOW_GROUND: TerrainModifier = TerrainModifier {
    defense_bonus: 0,
    range_bonus: 0,
    movement_cost: 0,
};
const TRENCHES: TerrainModifier = TerrainModifier {
    defense_bonus: 1,
    range_bonus: 0,
    movement_cost: 0,
};

pub const ALL_TERRAINS: [TerrainKind; 4] = [
    TerrainKind::Flat,
    TerrainKind::HighGround,
    TerrainKind::LowGround,
    TerrainKind::Trenches,
];

impl TerrainKind {
    pub fn modifier(self) -> &'static TerrainModifier {
        match self {
            TerrainKind::Flat => &FLAT,
            TerrainKind::HighGround => &HIGH_GROUND,
            TerrainKind::LowGround => &LOW_GROUND,
            TerrainKind::Trenches => &TRENCHES,
        }
    }

    /// 隨機地形生成權重
    pub fn spawn_weight(self) -> u32 {
        match self {
            TerrainKind::Flat => 50,
            TerrainKind::HighGround => 20,
            TerrainKind::LowGround => 20,
            TerrainKind::Trenches => 10,
        }
    }

    /// 文字顯示用符號
    pub fn symbol(self) -> char {
        match self {
            TerrainKind::Flat => '.',
            TerrainKind::HighGround => '^',
            TerrainKind::LowGround => 'v',
            TerrainKind::Trenches => '#',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<TerrainKind> {
        TerrainKind::iter().find(|t| t.symbol() == symbol)
    }

    /// 是否為有利防守的地形
    pub fn is_defensive(self) -> bool {
        matches!(self, TerrainKind::HighGround | TerrainKind::Trenches)
    }
}

/// 依權重隨機抽出地形
pub fn random_terrain(rng: &mut impl Rng) -> TerrainKind {
    ALL_TERRAINS
        .choose_weighted(rng, |kind| kind.spawn_weight())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    #[test]
    fn test_modifier_table() {
        let test_data = [
            (TerrainKind::Flat, 0, 0),
            (TerrainKind::HighGround, 1, 1),
            (TerrainKind::LowGround, 0, 0),
            (TerrainKind::Trenches, 1, 0),
        ];
        for (kind, defense, range) in test_data {
            let m = kind.modifier();
            assert_eq!(m.defense_bonus, defense, "{kind} defense");
            assert_eq!(m.range_bonus, range, "{kind} range");
            assert_eq!(m.movement_cost, 0, "{kind} movement");
        }
    }

    #[test]
    fn test_symbol_round_trip() {
        for kind in TerrainKind::iter() {
            assert_eq!(TerrainKind::from_symbol(kind.symbol()), Some(kind));
        }
        assert_eq!(TerrainKind::from_symbol('x'), None);
    }

    #[test]
    fn test_random_terrain_follows_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut counts: HashMap<TerrainKind, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(random_terrain(&mut rng)).or_default() += 1;
        }
        // 50/20/20/10，容許寬鬆誤差
        assert!((4_500..5_500).contains(&counts[&TerrainKind::Flat]));
        assert!((1_500..2_500).contains(&counts[&TerrainKind::HighGround]));
        assert!((1_500..2_500).contains(&counts[&TerrainKind::LowGround]));
        assert!((600..1_400).contains(&counts[&TerrainKind::Trenches]));
    }

    #[test]
    fn test_random_terrain_is_deterministic_for_seed() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        let xs: Vec<_> = (0..64).map(|_| random_terrain(&mut a)).collect();
        let ys: Vec<_> = (0..64).map(|_| random_terrain(&mut b)).collect();
        assert_eq!(xs, ys);
    }
}
