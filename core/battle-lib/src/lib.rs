//! 戰棋模擬核心：地形、棋盤、單位、戰鬥規則、回合、動作空間編碼與對局控制。
//!
//! 策略（人類、腳本或學習模型）只看得到合法動作索引集合與快照，
//! 引擎本身不關心索引是怎麼選出來的。
use serde::{Deserialize, Serialize};

mod action;
mod battle;
mod battlefield;
mod board;
mod config;
mod error;
mod game;
mod policy;
mod reward;
mod terrain;
mod unit;

pub use action::*;
pub use battle::*;
pub use battlefield::*;
pub use board::*;
pub use config::*;
pub use error::*;
pub use game::*;
pub use policy::*;
pub use reward::*;
pub use terrain::*;
pub use unit::*;

pub type Coord = usize;
pub type UnitID = usize;
pub type PlayerID = usize;
pub type TurnCount = u32;
pub type ActionIndex = usize;
pub type Hp = i32;
pub type RewardValue = f32;

/// 對局固定兩名玩家
pub const PLAYERS: [PlayerID; 2] = [0, 1];

#[derive(
    Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Pos {
    pub x: Coord,
    pub y: Coord,
}

impl Pos {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// 以有號位移取得新座標，結果為負時回傳 None（不檢查棋盤邊界）
    pub fn offset(self, dx: isize, dy: isize) -> Option<Pos> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Pos { x, y })
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
