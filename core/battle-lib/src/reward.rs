//! reward.rs：
//! - 計算每個已套用動作給策略的回饋值，只供策略參考，不影響模擬狀態。
//! - 被拒絕的動作與 NoOp 一律為 0。
use crate::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RewardWeights {
    /// 每點傷害
    pub damage: RewardValue,
    /// 每擊殺一個單位
    pub kill_bonus: RewardValue,
    /// 任何成功移動
    pub move_base: RewardValue,
    /// 落點與最近敵軍距離小於 proximity_range 時的加成
    pub proximity_bonus: RewardValue,
    pub proximity_range: Coord,
    pub high_ground_bonus: RewardValue,
    pub trenches_bonus: RewardValue,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            damage: 20.0,
            kill_bonus: 100.0,
            move_base: 2.0,
            proximity_bonus: 10.0,
            proximity_range: 5,
            high_ground_bonus: 8.0,
            trenches_bonus: 5.0,
        }
    }
}

impl RewardWeights {
    /// 攻擊回饋：所有命中的傷害加總，擊殺另有加成
    pub fn hit_reward(&self, hits: &[Hit]) -> RewardValue {
        hits.iter()
            .map(|hit| {
                let kill = if hit.killed { self.kill_bonus } else { 0.0 };
                hit.damage as RewardValue * self.damage + kill
            })
            .sum()
    }

    /// 移動回饋，以移動後的盤面計算
    pub fn move_reward(
        &self,
        battlefield: &Battlefield,
        player: PlayerID,
        target: Pos,
    ) -> RewardValue {
        let board = battlefield.board();
        let mut reward = self.move_base;

        let nearest_enemy = battlefield
            .units()
            .iter()
            .filter(|u| u.owner != player && u.is_alive())
            .map(|u| board.distance(target, u.pos))
            .min();
        if nearest_enemy.is_some_and(|d| d < self.proximity_range) {
            reward += self.proximity_bonus;
        }

        reward += match board.terrain_at(target) {
            Some(TerrainKind::HighGround) => self.high_ground_bonus,
            Some(TerrainKind::Trenches) => self.trenches_bonus,
            _ => 0.0,
        };
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_reward() {
        let weights = RewardWeights::default();
        let hit = |damage, killed| Hit {
            unit_id: 0,
            pos: Pos::default(),
            damage,
            killed,
        };
        let test_data = [
            (vec![], 0.0),
            (vec![hit(0, false)], 0.0),
            (vec![hit(2, false)], 40.0),
            (vec![hit(4, true)], 180.0),
            (vec![hit(4, true), hit(4, false)], 260.0),
        ];
        for (hits, expected) in test_data {
            assert_eq!(weights.hit_reward(&hits), expected, "{hits:?}");
        }
    }

    #[test]
    fn test_move_reward() {
        let mut rows = vec![vec![TerrainKind::Flat; 20]; 20];
        rows[0][1] = TerrainKind::HighGround;
        rows[1][0] = TerrainKind::Trenches;
        rows[10][10] = TerrainKind::HighGround;
        let mut bf = Battlefield::new(Board::from_terrain_rows(rows).unwrap());
        bf.spawn(UnitKind::Tank, 1, Pos::new(0, 4)).unwrap();
        bf.spawn(UnitKind::Tank, 0, Pos::new(19, 19)).unwrap();
        let weights = RewardWeights::default();
        let test_data = [
            // 平地、距離 4
            (Pos::new(0, 0), 12.0),
            // 高地、距離 5 不算接近
            (Pos::new(1, 0), 10.0),
            // 壕溝、距離 3
            (Pos::new(0, 1), 17.0),
            (Pos::new(10, 10), 10.0),
            (Pos::new(15, 15), 2.0),
        ];
        for (target, expected) in test_data {
            assert_eq!(weights.move_reward(&bf, 0, target), expected, "{target}");
        }
    }

    #[test]
    fn test_move_reward_without_enemies() {
        let bf = Battlefield::new(Board::uniform(4, 4, TerrainKind::Flat).unwrap());
        let weights = RewardWeights::default();
        assert_eq!(weights.move_reward(&bf, 0, Pos::new(1, 1)), 2.0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let weights: RewardWeights = toml::from_str("kill_bonus = 50.0").unwrap();
        assert_eq!(weights.kill_bonus, 50.0);
        assert_eq!(weights.damage, 20.0);
        assert_eq!(weights.proximity_range, 5);
    }
}
