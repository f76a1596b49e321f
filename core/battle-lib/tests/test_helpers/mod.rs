//! 測試輔助：用 ASCII art 定義地形與部署
//!
//! 格式：每行用空格分隔的格子
//! - 地形：`.` 平地、`^` 高地、`v` 低地、`#` 壕溝
//! - 單位：`1` `2` `3` 為玩家 0 的士兵、坦克、迫砲，`A` `B` `C` 為玩家 1；
//!   單位符號後可接地形符號，例如 `1#` 是站在壕溝的士兵，省略則為平地
//!
//! 單位依列優先順序部署，ID 也依此順序配發。
//!
//! ```text
//! 3  .  .
//! .  ^  .
//! Bv .  A
//! ```
#![allow(dead_code)]

use battle_lib::*;

fn parse_unit(symbol: char) -> Option<(UnitKind, PlayerID)> {
    let unit = match symbol {
        '1' => (UnitKind::SoldierSquad, 0),
        '2' => (UnitKind::Tank, 0),
        '3' => (UnitKind::MortarSquad, 0),
        'A' => (UnitKind::SoldierSquad, 1),
        'B' => (UnitKind::Tank, 1),
        'C' => (UnitKind::MortarSquad, 1),
        _ => return None,
    };
    Some(unit)
}

fn parse_cell(cell: &str) -> (TerrainKind, Option<(UnitKind, PlayerID)>) {
    let mut chars = cell.chars();
    let first = chars.next().expect("空白格子");
    match parse_unit(first) {
        Some(unit) => {
            let terrain = chars
                .next()
                .map(|c| TerrainKind::from_symbol(c).expect("無法辨識的地形符號"))
                .unwrap_or_default();
            (terrain, Some(unit))
        }
        None => (
            TerrainKind::from_symbol(first).expect("無法辨識的格子符號"),
            None,
        ),
    }
}

/// 解析 ASCII 成 (地形列, 部署表)
pub fn parse_ascii(ascii: &str) -> (Vec<Vec<TerrainKind>>, Vec<Deployment>) {
    let lines: Vec<&str> = ascii
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();
    let mut rows = Vec::new();
    let mut deployment = Vec::new();
    for (y, line) in lines.iter().enumerate() {
        let mut row = Vec::new();
        for (x, cell) in line.split_whitespace().enumerate() {
            let (terrain, unit) = parse_cell(cell);
            row.push(terrain);
            if let Some((kind, owner)) = unit {
                deployment.push(Deployment::new(kind, owner, x, y));
            }
        }
        rows.push(row);
    }
    (rows, deployment)
}

pub fn battlefield_from_ascii(ascii: &str) -> Battlefield {
    let (rows, deployment) = parse_ascii(ascii);
    let mut bf = Battlefield::new(Board::from_terrain_rows(rows).unwrap());
    for d in deployment {
        bf.spawn(d.kind, d.owner, d.pos).unwrap();
    }
    bf
}

/// 以 ASCII 建立固定地形的對局設定
pub fn config_from_ascii(ascii: &str) -> MatchConfig {
    let (rows, deployment) = parse_ascii(ascii);
    let terrain = rows
        .iter()
        .map(|row| row.iter().map(|t| t.symbol()).collect())
        .collect();
    MatchConfig {
        width: rows.first().map(|r| r.len()).unwrap_or_default(),
        height: rows.len(),
        seed: Some(0),
        terrain: Some(terrain),
        deployment,
        ..Default::default()
    }
}

pub fn match_from_ascii(ascii: &str) -> Match {
    Match::new(config_from_ascii(ascii)).unwrap()
}

/// 以動作找索引並執行，動作必須在合法集合內
pub fn step_action(game: &mut Match, action: Action) -> StepResult {
    let player = game.current_player();
    let index = game
        .action_space()
        .encode(game.battlefield(), player, &action)
        .expect("無法編碼的動作");
    assert!(
        game.legal_actions().contains(&index),
        "{action:?} 不在合法動作中"
    );
    game.step(index)
}

/// 不做任何事直接換手
pub fn pass(game: &mut Match) -> StepResult {
    game.step(usize::MAX)
}
