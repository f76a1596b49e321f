//! unit.rs：
//! - 定義單位種類、固定屬性表與單位實例（Unit）。
//! - 所有單位屬性衍生值（有效防禦、有效射程）在此計算。
//! - 不負責戰鬥流程與判定（傷害結算、範圍攻擊等）。
use crate::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Display, EnumIter, PartialEq, Eq, Hash)]
pub enum UnitKind {
    SoldierSquad,
    Tank,
    MortarSquad,
}

/// 單位種類的固定屬性，數值需與已訓練的策略保持一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub max_hp: Hp,
    pub attack_power: i32,
    pub base_defense: i32,
    pub move_speed: Coord,
    pub base_range: Coord,
    pub is_area_effect: bool,
    /// 攻擊延遲回合數（0 = 立即結算）
    pub attack_delay: u32,
}

const SOLDIER_SQUAD: UnitStats = UnitStats {
    max_hp: 1,
    attack_power: 1,
    base_defense: 1,
    move_speed: 1,
    base_range: 2,
    is_area_effect: false,
    attack_delay: 0,
};
const TANK: UnitStats = UnitStats {
    max_hp: 1,
    attack_power: 5,
    base_defense: 1,
    move_speed: 1,
    base_range: 5,
    is_area_effect: true,
    attack_delay: 0,
};
const MORTAR_SQUAD: UnitStats = UnitStats {
    max_hp: 5,
    attack_power: 1,
    base_defense: 1,
    move_speed: 1,
    base_range: 10,
    is_area_effect: true,
    attack_delay: 1,
};

impl UnitKind {
    pub fn stats(self) -> &'static UnitStats {
        match self {
            UnitKind::SoldierSquad => &SOLDIER_SQUAD,
            UnitKind::Tank => &TANK,
            UnitKind::MortarSquad => &MORTAR_SQUAD,
        }
    }

    /// 文字顯示用符號，玩家 0 用數字、玩家 1 用字母
    pub fn symbol(self, owner: PlayerID) -> char {
        match (self, owner) {
            (UnitKind::SoldierSquad, 0) => '1',
            (UnitKind::Tank, 0) => '2',
            (UnitKind::MortarSquad, 0) => '3',
            (UnitKind::SoldierSquad, _) => 'A',
            (UnitKind::Tank, _) => 'B',
            (UnitKind::MortarSquad, _) => 'C',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub id: UnitID,
    pub kind: UnitKind,
    pub owner: PlayerID,
    pub pos: Pos,
    pub hp: Hp,
    pub has_moved: bool,
    pub has_attacked: bool,
}

impl Unit {
    pub fn new(id: UnitID, kind: UnitKind, owner: PlayerID, pos: Pos) -> Self {
        Self {
            id,
            kind,
            owner,
            pos,
            hp: kind.stats().max_hp,
            has_moved: false,
            has_attacked: false,
        }
    }

    pub fn stats(&self) -> &'static UnitStats {
        self.kind.stats()
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// 本回合已移動且已攻擊，不再有任何動作
    pub fn is_exhausted(&self) -> bool {
        self.has_moved && self.has_attacked
    }

    /// 單位自身的防禦值（士兵在壕溝 +1），地形表的防禦加成另計
    pub fn effective_defense(&self, terrain: TerrainKind) -> i32 {
        let base = self.stats().base_defense;
        if self.kind == UnitKind::SoldierSquad && terrain == TerrainKind::Trenches {
            base + 1
        } else {
            base
        }
    }

    /// 以所站地形計算射程（高地 +1）
    pub fn effective_range(&self, terrain: TerrainKind) -> Coord {
        let bonus = terrain.modifier().range_bonus.max(0) as Coord;
        self.stats().base_range + bonus
    }

    pub fn reset_turn(&mut self) {
        self.has_moved = false;
        self.has_attacked = false;
    }

    /// 扣血（不低於 0），回傳是否因此陣亡
    pub fn take_damage(&mut self, damage: Hp) -> bool {
        let was_alive = self.is_alive();
        self.hp = (self.hp - damage.max(0)).max(0);
        was_alive && !self.is_alive()
    }
}
