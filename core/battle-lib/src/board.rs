//! board.rs：
//! - 固定尺寸的格子棋盤，每格一種地形，最多一個佔據者。
//! - 提供邊界、曼哈頓距離與方形範圍查詢。
//! - 只記錄佔據關係，不知道單位的屬性與存活狀態。
use crate::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub occupant: Option<UnitID>,
}

#[derive(Debug, Clone)]
pub struct Board {
    width: Coord,
    height: Coord,
    // tiles[y][x]
    tiles: Vec<Vec<Tile>>,
}

impl Board {
    /// 建立隨機地形棋盤
    pub fn generate(width: Coord, height: Coord, rng: &mut impl Rng) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut tiles = Vec::with_capacity(height);
        for _ in 0..height {
            let mut row = Vec::with_capacity(width);
            for _ in 0..width {
                row.push(Tile {
                    terrain: random_terrain(rng),
                    occupant: None,
                });
            }
            tiles.push(row);
        }
        Ok(Board {
            width,
            height,
            tiles,
        })
    }

    /// 以單一地形建立棋盤
    pub fn uniform(width: Coord, height: Coord, terrain: TerrainKind) -> Result<Self> {
        check_dimensions(width, height)?;
        let tiles = vec![
            vec![
                Tile {
                    terrain,
                    occupant: None,
                };
                width
            ];
            height
        ];
        Ok(Board {
            width,
            height,
            tiles,
        })
    }

    /// 由逐列地形建立棋盤，每列長度必須一致
    pub fn from_terrain_rows(rows: Vec<Vec<TerrainKind>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        check_dimensions(width, height)?;
        if rows.iter().any(|row| row.len() != width) {
            return Err(BoardError::InvalidDimensions { width, height }.into());
        }
        let tiles = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|terrain| Tile {
                        terrain,
                        occupant: None,
                    })
                    .collect()
            })
            .collect();
        Ok(Board {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> Coord {
        self.width
    }

    pub fn height(&self) -> Coord {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn tile_at(&self, pos: Pos) -> Option<&Tile> {
        let Pos { x, y } = pos;
        self.tiles.get(y)?.get(x)
    }

    fn tile_at_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        let Pos { x, y } = pos;
        self.tiles.get_mut(y)?.get_mut(x)
    }

    pub fn terrain_at(&self, pos: Pos) -> Option<TerrainKind> {
        self.tile_at(pos).map(|t| t.terrain)
    }

    pub fn occupant_at(&self, pos: Pos) -> Option<UnitID> {
        self.tile_at(pos).and_then(|t| t.occupant)
    }

    /// 曼哈頓距離
    pub fn distance(&self, from: Pos, to: Pos) -> Coord {
        manhattan_distance(from, to)
    }

    /// 以 center 為中心、各軸相差不超過 radius 的所有棋盤內座標（方形，非菱形）
    pub fn area_around(&self, center: Pos, radius: Coord) -> Vec<Pos> {
        square_area(center, radius, |pos| self.in_bounds(pos))
    }

    /// 所有座標，列優先（y 外層、x 內層）
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos { x, y }))
    }

    /// 把單位放上空格
    pub fn place(&mut self, unit_id: UnitID, pos: Pos) -> Result<()> {
        let (width, height) = (self.width, self.height);
        let tile = self
            .tile_at_mut(pos)
            .ok_or(BoardError::OutOfBounds { pos, width, height })?;
        if let Some(occupant) = tile.occupant {
            return Err(BoardError::PosOccupied { pos, occupant }.into());
        }
        tile.occupant = Some(unit_id);
        Ok(())
    }

    /// 清除指定格上的單位，單位必須確實在該格
    pub fn vacate(&mut self, unit_id: UnitID, pos: Pos) -> Result<()> {
        match self.tile_at_mut(pos) {
            Some(tile) if tile.occupant == Some(unit_id) => {
                tile.occupant = None;
                Ok(())
            }
            _ => Err(BoardError::UnitNotAtPos { unit_id, pos }.into()),
        }
    }

    /// 把單位從 from 移到 to；任何檢查失敗都不改動棋盤
    pub fn relocate(&mut self, unit_id: UnitID, from: Pos, to: Pos) -> Result<()> {
        if self.occupant_at(from) != Some(unit_id) {
            return Err(BoardError::UnitNotAtPos { unit_id, pos: from }.into());
        }
        if !self.in_bounds(to) {
            return Err(BoardError::OutOfBounds {
                pos: to,
                width: self.width,
                height: self.height,
            }
            .into());
        }
        if let Some(occupant) = self.occupant_at(to) {
            return Err(BoardError::PosOccupied { pos: to, occupant }.into());
        }
        self.vacate(unit_id, from)?;
        self.place(unit_id, to)
    }
}

fn check_dimensions(width: Coord, height: Coord) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BoardError::InvalidDimensions { width, height }.into());
    }
    Ok(())
}
