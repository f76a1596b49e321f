//! config.rs：
//! - 對局設定：棋盤尺寸、回合上限、動作空間 slot 數、亂數種子、部署表與回饋權重。
//! - 所有欄位都有預設值，預設即為標準 20x20 對局。
//! - 只做讀取與驗證，不建立棋盤或單位。
use crate::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// 棋盤格數上限，同時保證動作空間大小不溢位
pub const MAX_BOARD_CELLS: usize = 256 * 256;

/// 部署表中的一筆：單位種類、陣營與起始位置
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub kind: UnitKind,
    pub owner: PlayerID,
    pub pos: Pos,
}

impl Deployment {
    pub const fn new(kind: UnitKind, owner: PlayerID, x: Coord, y: Coord) -> Self {
        Self {
            kind,
            owner,
            pos: Pos::new(x, y),
        }
    }
}

/// 標準部署，單位 ID 依此順序配發
pub const REFERENCE_DEPLOYMENT: [Deployment; 10] = [
    Deployment::new(UnitKind::SoldierSquad, 0, 1, 5),
    Deployment::new(UnitKind::SoldierSquad, 0, 2, 6),
    Deployment::new(UnitKind::SoldierSquad, 0, 1, 7),
    Deployment::new(UnitKind::Tank, 0, 0, 6),
    Deployment::new(UnitKind::MortarSquad, 0, 0, 10),
    Deployment::new(UnitKind::SoldierSquad, 1, 18, 5),
    Deployment::new(UnitKind::SoldierSquad, 1, 17, 6),
    Deployment::new(UnitKind::SoldierSquad, 1, 18, 7),
    Deployment::new(UnitKind::Tank, 1, 19, 6),
    Deployment::new(UnitKind::MortarSquad, 1, 19, 10),
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    pub width: Coord,
    pub height: Coord,
    pub max_turns: TurnCount,
    pub unit_slots: usize,
    /// 未指定時每場對局使用系統亂數
    pub seed: Option<u64>,
    /// 固定地形，每列一個字串（`.` `^` `v` `#`）；未指定時隨機產生
    pub terrain: Option<Vec<String>>,
    pub deployment: Vec<Deployment>,
    pub reward: RewardWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            max_turns: 200,
            unit_slots: 5,
            seed: None,
            terrain: None,
            deployment: REFERENCE_DEPLOYMENT.to_vec(),
            reward: RewardWeights::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).context(format!("載入設定檔 {}", path.display()))
    }

    /// 驗證設定：
    /// - 棋盤尺寸與 slot 數為正，格數不超過 [`MAX_BOARD_CELLS`]
    /// - 固定地形與棋盤尺寸一致、符號合法
    /// - 部署位置在棋盤內且不重疊，陣營只能是 0 或 1
    /// - 任一陣營的單位數不超過 slot 數
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }
            .into());
        }
        if self.unit_slots == 0 {
            return Err(ConfigError::InvalidValue("unit_slots 必須為正數".to_string()).into());
        }
        let cells = self
            .width
            .checked_mul(self.height)
            .filter(|&cells| cells <= MAX_BOARD_CELLS)
            .ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "棋盤 {}x{} 超過 {MAX_BOARD_CELLS} 格",
                    self.width, self.height
                ))
            })?;
        if (cells + MOVE_BLOCK_SIZE).checked_mul(self.unit_slots).is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "unit_slots {} 使動作空間溢位",
                self.unit_slots
            ))
            .into());
        }
        if self.terrain.is_some() {
            self.terrain_rows()?;
        }

        let mut seen = BTreeSet::new();
        for (i, d) in self.deployment.iter().enumerate() {
            if !PLAYERS.contains(&d.owner) {
                return Err(ConfigError::InvalidDeployment(format!(
                    "第 {i} 筆的陣營 {} 不存在",
                    d.owner
                ))
                .into());
            }
            if d.pos.x >= self.width || d.pos.y >= self.height {
                return Err(ConfigError::InvalidDeployment(format!(
                    "第 {i} 筆位置 {} 超出棋盤 {}x{}",
                    d.pos, self.width, self.height
                ))
                .into());
            }
            if !seen.insert(d.pos) {
                return Err(ConfigError::InvalidDeployment(format!(
                    "第 {i} 筆位置 {} 重複部署",
                    d.pos
                ))
                .into());
            }
        }
        for player in PLAYERS {
            let count = self.deployment.iter().filter(|d| d.owner == player).count();
            if count > self.unit_slots {
                return Err(ConfigError::InvalidDeployment(format!(
                    "玩家 {player} 有 {count} 個單位，超過 slot 數 {}",
                    self.unit_slots
                ))
                .into());
            }
        }
        Ok(())
    }

    /// 解析固定地形；未設定時回傳 None
    pub fn terrain_rows(&self) -> Result<Option<Vec<Vec<TerrainKind>>>> {
        let Some(lines) = &self.terrain else {
            return Ok(None);
        };
        if lines.len() != self.height {
            return Err(ConfigError::InvalidValue(format!(
                "地形有 {} 列，棋盤高度為 {}",
                lines.len(),
                self.height
            ))
            .into());
        }
        let mut rows = Vec::with_capacity(lines.len());
        for (y, line) in lines.iter().enumerate() {
            let mut row = Vec::with_capacity(self.width);
            for c in line.chars() {
                let terrain = TerrainKind::from_symbol(c).ok_or_else(|| {
                    ConfigError::InvalidValue(format!("第 {y} 列有無法辨識的地形符號 {c:?}"))
                })?;
                row.push(terrain);
            }
            if row.len() != self.width {
                return Err(ConfigError::InvalidValue(format!(
                    "第 {y} 列寬度 {}，棋盤寬度為 {}",
                    row.len(),
                    self.width
                ))
                .into());
            }
            rows.push(row);
        }
        Ok(Some(rows))
    }
}
