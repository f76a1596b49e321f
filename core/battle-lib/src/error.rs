//! 錯誤處理系統
//!
//! - 規則違反（非法移動、非法攻擊）屬於可恢復錯誤，呼叫端應先查合法動作
//! - 棋盤建立與設定檔錯誤會中止對局建立
//! - 過期的動作索引不是錯誤，解碼時直接退化成 NoOp
use crate::*;
use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// 頂層錯誤，包含原始錯誤和 context 鏈
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    contexts: Vec<String>,
}

/// 錯誤種類
#[derive(Debug, ThisError)]
pub enum ErrorKind {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 棋盤錯誤
#[derive(Debug, ThisError)]
pub enum BoardError {
    #[error("棋盤尺寸必須為正數: {width}x{height}")]
    InvalidDimensions { width: Coord, height: Coord },
    #[error("位置超出棋盤邊界: {pos} 邊界 ({width}, {height})")]
    OutOfBounds {
        pos: Pos,
        width: Coord,
        height: Coord,
    },
    #[error("位置 {pos} 已被單位 {occupant} 佔據")]
    PosOccupied { pos: Pos, occupant: UnitID },
    #[error("單位 {unit_id} 不在 {pos}")]
    UnitNotAtPos { unit_id: UnitID, pos: Pos },
    #[error("單位 {unit_id} 不存在")]
    UnknownUnit { unit_id: UnitID },
}

/// 規則錯誤（可恢復）
#[derive(Debug, ThisError)]
pub enum RuleError {
    #[error("單位 {unit_id} 無法移動到 {target}: {reason}")]
    IllegalMove {
        unit_id: UnitID,
        target: Pos,
        reason: MoveViolation,
    },
    #[error("單位 {unit_id} 無法攻擊 {target}: {reason}")]
    IllegalAttack {
        unit_id: UnitID,
        target: Pos,
        reason: AttackViolation,
    },
}

/// 非法移動原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum MoveViolation {
    #[error("單位已陣亡")]
    Dead,
    #[error("超出棋盤")]
    OutOfBounds,
    #[error("目標格已被佔據")]
    Occupied,
    #[error("距離 {distance} 超過移動力 {speed}")]
    TooFar { distance: Coord, speed: Coord },
}

/// 非法攻擊原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum AttackViolation {
    #[error("單位已陣亡")]
    Dead,
    #[error("本回合已攻擊")]
    AlreadyAttacked,
    #[error("超出棋盤")]
    OutOfBounds,
    #[error("距離 {distance} 超過射程 {range}")]
    OutOfRange { distance: Coord, range: Coord },
    #[error("目標格沒有敵方單位")]
    NoEnemyAtTarget,
}

/// 設定檔錯誤
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("TOML 解析失敗: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("讀取設定檔失敗 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("部署無效: {0}")]
    InvalidDeployment(String),
    #[error("設定值無效: {0}")]
    InvalidValue(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// 添加錯誤上下文，自動記錄呼叫位置
    #[track_caller]
    pub fn context<C: Into<String>>(mut self, context: C) -> Self {
        let loc = std::panic::Location::caller();
        let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
        self.contexts.push(msg);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for ctx in &self.contexts {
            write!(f, "\n  {}", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl<E: Into<ErrorKind>> From<E> for Error {
    fn from(error: E) -> Self {
        Self {
            kind: error.into(),
            contexts: Vec::new(),
        }
    }
}

/// Result 擴展 trait，用於添加錯誤上下文
pub trait Context<T> {
    fn context<C: Into<String>>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        let loc = std::panic::Location::caller();
        self.map_err(|e| {
            let msg = format!("{} [{}:{}]", context.into(), loc.file(), loc.line());
            let mut e = e;
            e.contexts.push(msg);
            e
        })
    }
}
