//! codec.rs：
//! - 動作空間編碼：把「單位 + 意圖」與固定大小的整數索引互相轉換。
//! - 每個 slot 區塊 = 25 個移動索引 + width*height 個攻擊索引。
//! - slot i 指的是行動玩家「目前存活」單位依建立順序排列後的第 i 個，
//!   單位陣亡後索引會漂移，過期索引一律解碼成 NoOp。
use crate::*;
use serde::Serialize;

/// 移動視窗半徑（5x5）
pub const MOVE_WINDOW_RADIUS: isize = 2;

/// 每個 slot 的移動子區塊大小；24 個位移加上 1 個保留索引
pub const MOVE_BLOCK_SIZE: usize = 25;

/// 5x5 視窗中除中心外的 24 個位移，dx 外層、dy 內層
pub const MOVE_OFFSETS: [(isize, isize); 24] = build_move_offsets();

const fn build_move_offsets() -> [(isize, isize); 24] {
    let mut offsets = [(0, 0); 24];
    let mut i = 0;
    let mut dx = -MOVE_WINDOW_RADIUS;
    while dx <= MOVE_WINDOW_RADIUS {
        let mut dy = -MOVE_WINDOW_RADIUS;
        while dy <= MOVE_WINDOW_RADIUS {
            if dx != 0 || dy != 0 {
                offsets[i] = (dx, dy);
                i += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    offsets
}

/// 解碼後的遊戲動作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Move { unit: UnitID, target: Pos },
    Attack { unit: UnitID, target: Pos },
    NoOp,
}

impl Action {
    pub fn unit(&self) -> Option<UnitID> {
        match self {
            Action::Move { unit, .. } | Action::Attack { unit, .. } => Some(*unit),
            Action::NoOp => None,
        }
    }
}

/// 固定大小的離散動作空間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpace {
    width: Coord,
    height: Coord,
    unit_slots: usize,
}

impl ActionSpace {
    pub fn new(width: Coord, height: Coord, unit_slots: usize) -> Self {
        Self {
            width,
            height,
            unit_slots,
        }
    }

    pub fn for_board(board: &Board, unit_slots: usize) -> Self {
        Self::new(board.width(), board.height(), unit_slots)
    }

    pub fn unit_slots(&self) -> usize {
        self.unit_slots
    }

    /// 單一 slot 的區塊大小
    pub fn block_size(&self) -> usize {
        MOVE_BLOCK_SIZE + self.width * self.height
    }

    /// 動作空間總大小
    pub fn size(&self) -> usize {
        self.unit_slots * self.block_size()
    }

    /// 索引 → 動作；任何超出範圍或過期的索引都回傳 NoOp
    pub fn decode(&self, battlefield: &Battlefield, player: PlayerID, index: ActionIndex) -> Action {
        if index >= self.size() {
            return Action::NoOp;
        }
        let slot = index / self.block_size();
        let local = index % self.block_size();
        let Some(unit) = battlefield.live_units_of(player).nth(slot) else {
            return Action::NoOp;
        };

        if local < MOVE_BLOCK_SIZE {
            let Some(&(dx, dy)) = MOVE_OFFSETS.get(local) else {
                return Action::NoOp;
            };
            return match unit.pos.offset(dx, dy) {
                Some(target) if battlefield.board().in_bounds(target) => Action::Move {
                    unit: unit.id,
                    target,
                },
                _ => Action::NoOp,
            };
        }

        let tile = local - MOVE_BLOCK_SIZE;
        let target = Pos {
            x: tile % self.width,
            y: tile / self.width,
        };
        Action::Attack {
            unit: unit.id,
            target,
        }
    }

    /// 動作 → 索引；無法表示時回傳 None
    pub fn encode(
        &self,
        battlefield: &Battlefield,
        player: PlayerID,
        action: &Action,
    ) -> Option<ActionIndex> {
        let unit_id = action.unit()?;
        let slot = battlefield
            .live_units_of(player)
            .position(|u| u.id == unit_id)?;
        if slot >= self.unit_slots {
            return None;
        }
        let base = slot * self.block_size();

        match *action {
            Action::Move { target, .. } => {
                let from = battlefield.unit(unit_id)?.pos;
                let dx = target.x as isize - from.x as isize;
                let dy = target.y as isize - from.y as isize;
                let local = MOVE_OFFSETS.iter().position(|&o| o == (dx, dy))?;
                Some(base + local)
            }
            Action::Attack { target, .. } => {
                if target.x >= self.width || target.y >= self.height {
                    return None;
                }
                Some(base + MOVE_BLOCK_SIZE + target.y * self.width + target.x)
            }
            Action::NoOp => None,
        }
    }

    /// 列出玩家所有合法動作索引（遞增排序）
    ///
    /// 已移動且已攻擊的單位整個區塊略過。結果為空時回傳 `[0]`，
    /// 讓策略永遠有東西可選；呼叫端解碼後若不合法則視為 NoOp。
    pub fn legal_actions(&self, battlefield: &Battlefield, player: PlayerID) -> Vec<ActionIndex> {
        let mut legal = Vec::new();
        let enemies: Vec<&Unit> = battlefield
            .units()
            .iter()
            .filter(|u| u.owner != player && u.is_alive())
            .collect();

        for (slot, unit) in battlefield
            .live_units_of(player)
            .enumerate()
            .take(self.unit_slots)
        {
            if unit.is_exhausted() {
                continue;
            }
            let base = slot * self.block_size();

            for (local, &(dx, dy)) in MOVE_OFFSETS.iter().enumerate() {
                if let Some(target) = unit.pos.offset(dx, dy) {
                    if can_move_to(battlefield, unit.id, target) {
                        legal.push(base + local);
                    }
                }
            }

            let mut attacks: Vec<ActionIndex> = enemies
                .iter()
                .filter(|enemy| enemy.pos.x < self.width && enemy.pos.y < self.height)
                .filter(|enemy| can_attack(battlefield, unit.id, enemy.pos))
                .map(|enemy| base + MOVE_BLOCK_SIZE + enemy.pos.y * self.width + enemy.pos.x)
                .collect();
            attacks.sort_unstable();
            legal.extend(attacks);
        }

        if legal.is_empty() {
            legal.push(0);
        }
        legal
    }
}
