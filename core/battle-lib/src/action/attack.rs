//! attack.rs：
//! - 負責攻擊合法性、傷害計算、範圍攻擊與延遲砲擊的排程與結算。
//! - 同一次結算的所有傷害先全部算完再一起套用，陣亡單位立即離開棋盤。
//! - 不負責回合輪替與勝負判定。
use crate::*;

/// 範圍攻擊半徑（以目標格為中心的 3x3）
pub const AREA_EFFECT_RADIUS: Coord = 1;

/// 一次結算中對單一單位造成的傷害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub unit_id: UnitID,
    pub pos: Pos,
    pub damage: Hp,
    pub killed: bool,
}

/// 已排程、尚未落地的延遲攻擊
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStrike {
    pub attacker: UnitID,
    pub owner: PlayerID,
    pub attack_power: i32,
    pub is_area_effect: bool,
    pub target: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    /// 立即結算
    Resolved(Vec<Hit>),
    /// 於攻擊方下一回合開始時結算
    Scheduled(PendingStrike),
}

/// 傷害公式：max(0, 攻擊 - 防禦)
///
/// 防禦 = 單位有效防禦 + 目標地形防禦加成，低地再 -1。
pub fn calc_damage(attack_power: i32, defender: &Unit, target_terrain: TerrainKind) -> Hp {
    let mut defense =
        defender.effective_defense(target_terrain) + target_terrain.modifier().defense_bonus;
    if target_terrain == TerrainKind::LowGround {
        defense -= 1;
    }
    (attack_power - defense).max(0)
}

/// 檢查攻擊是否合法，射程以攻擊方所站地形計算
pub fn check_attack(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> Result<()> {
    let unit = battlefield
        .unit(unit_id)
        .ok_or(BoardError::UnknownUnit { unit_id })?;
    let illegal = |reason| RuleError::IllegalAttack {
        unit_id,
        target,
        reason,
    };

    if !unit.is_alive() {
        return Err(illegal(AttackViolation::Dead).into());
    }
    if unit.has_attacked {
        return Err(illegal(AttackViolation::AlreadyAttacked).into());
    }
    let board = battlefield.board();
    if !board.in_bounds(target) {
        return Err(illegal(AttackViolation::OutOfBounds).into());
    }
    let own_terrain = board.terrain_at(unit.pos).unwrap_or_default();
    let range = unit.effective_range(own_terrain);
    let distance = board.distance(unit.pos, target);
    if distance > range {
        return Err(illegal(AttackViolation::OutOfRange { distance, range }).into());
    }
    match battlefield.unit_at(target) {
        Some(enemy) if enemy.owner != unit.owner => Ok(()),
        _ => Err(illegal(AttackViolation::NoEnemyAtTarget).into()),
    }
}

pub fn can_attack(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> bool {
    check_attack(battlefield, unit_id, target).is_ok()
}

/// 受影響的格子：範圍攻擊為目標周圍 3x3，單體攻擊只有目標格
pub fn affected_area(board: &Board, target: Pos, is_area_effect: bool) -> Vec<Pos> {
    if is_area_effect {
        board.area_around(target, AREA_EFFECT_RADIUS)
    } else if board.in_bounds(target) {
        vec![target]
    } else {
        vec![]
    }
}

/// 預覽一次攻擊在目前盤面會造成的傷害（不改動狀態），只計算敵方存活單位
pub fn preview_hits(battlefield: &Battlefield, strike: &PendingStrike) -> Vec<Hit> {
    let board = battlefield.board();
    affected_area(board, strike.target, strike.is_area_effect)
        .into_iter()
        .filter_map(|pos| {
            let enemy = battlefield.unit_at(pos)?;
            if enemy.owner == strike.owner {
                return None;
            }
            let terrain = board.terrain_at(pos)?;
            let damage = calc_damage(strike.attack_power, enemy, terrain);
            Some(Hit {
                unit_id: enemy.id,
                pos,
                damage,
                killed: damage >= enemy.hp,
            })
        })
        .collect()
}

/// 發動攻擊；非法攻擊回傳錯誤且不改動狀態
///
/// 無論是否延遲，攻擊方都會標記為本回合已攻擊。
pub fn attack(battlefield: &mut Battlefield, unit_id: UnitID, target: Pos) -> Result<AttackOutcome> {
    let func = "attack";

    check_attack(battlefield, unit_id, target)?;
    let unit = battlefield
        .unit_mut(unit_id)
        .ok_or(BoardError::UnknownUnit { unit_id })?;
    unit.has_attacked = true;
    let stats = unit.stats();
    let strike = PendingStrike {
        attacker: unit_id,
        owner: unit.owner,
        attack_power: stats.attack_power,
        is_area_effect: stats.is_area_effect,
        target,
    };

    if stats.attack_delay > 0 {
        tracing::debug!(unit_id, target = %target, delay = stats.attack_delay, "strike scheduled");
        return Ok(AttackOutcome::Scheduled(strike));
    }
    let hits = resolve_strike(battlefield, &strike).context(func)?;
    Ok(AttackOutcome::Resolved(hits))
}

/// 結算攻擊：對目前位於受影響格上的敵方單位造成傷害
///
/// 延遲砲擊以落地當下的佔據者與地形計算，發射者是否仍存活不影響結算。
pub fn resolve_strike(battlefield: &mut Battlefield, strike: &PendingStrike) -> Result<Vec<Hit>> {
    let hits = preview_hits(battlefield, strike);
    let mut applied = Vec::with_capacity(hits.len());
    for hit in hits {
        let killed = battlefield.apply_damage(hit.unit_id, hit.damage)?;
        tracing::debug!(
            attacker = strike.attacker,
            target = hit.unit_id,
            damage = hit.damage,
            killed,
            "hit resolved"
        );
        applied.push(Hit { killed, ..hit });
    }
    Ok(applied)
}
