//! movement.rs：
//! - 負責單位移動規則（落點合法性與執行）。
//! - 只檢查終點：棋盤內、無人佔據、曼哈頓距離不超過移動力；不做路徑阻擋判定。
//! - 不負責戰鬥判定、策略決策或棋盤初始化。
use crate::*;

/// 檢查單位能否移動到 target，回傳第一個違反的規則
pub fn check_move(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> Result<()> {
    let unit = battlefield
        .unit(unit_id)
        .ok_or(BoardError::UnknownUnit { unit_id })?;
    let illegal = |reason| RuleError::IllegalMove {
        unit_id,
        target,
        reason,
    };

    if !unit.is_alive() {
        return Err(illegal(MoveViolation::Dead).into());
    }
    let board = battlefield.board();
    if !board.in_bounds(target) {
        return Err(illegal(MoveViolation::OutOfBounds).into());
    }
    if board.occupant_at(target).is_some() {
        return Err(illegal(MoveViolation::Occupied).into());
    }
    let distance = board.distance(unit.pos, target);
    let speed = unit.stats().move_speed;
    if distance > speed {
        return Err(illegal(MoveViolation::TooFar { distance, speed }).into());
    }
    Ok(())
}

pub fn can_move_to(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> bool {
    check_move(battlefield, unit_id, target).is_ok()
}

/// 執行移動：清空原格、佔據新格、更新座標並標記已移動
///
/// 非法移動會回傳錯誤且不改動任何狀態。
pub fn move_unit(battlefield: &mut Battlefield, unit_id: UnitID, target: Pos) -> Result<()> {
    check_move(battlefield, unit_id, target)?;
    battlefield.relocate(unit_id, target)?;
    if let Some(unit) = battlefield.unit_mut(unit_id) {
        unit.has_moved = true;
        tracing::debug!(unit_id, kind = %unit.kind, to = %target, "unit moved");
    }
    Ok(())
}
