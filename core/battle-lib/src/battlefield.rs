//! battlefield.rs：
//! - 棋盤與單位集合的組合，負責維持「格子佔據者 ⇔ 單位座標」一致。
//! - 單位陣亡後保留在集合中（索引穩定），但會從棋盤上移除。
use crate::*;

#[derive(Debug, Clone)]
pub struct Battlefield {
    board: Board,
    units: Vec<Unit>,
}

impl Battlefield {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            units: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, unit_id: UnitID) -> Option<&Unit> {
        self.units.get(unit_id)
    }

    pub(crate) fn unit_mut(&mut self, unit_id: UnitID) -> Option<&mut Unit> {
        self.units.get_mut(unit_id)
    }

    /// 部署新單位，ID 依建立順序遞增
    pub fn spawn(&mut self, kind: UnitKind, owner: PlayerID, pos: Pos) -> Result<UnitID> {
        let unit_id = self.units.len();
        self.board
            .place(unit_id, pos)
            .context(format!("部署 {kind} 到 {pos}"))?;
        self.units.push(Unit::new(unit_id, kind, owner, pos));
        Ok(unit_id)
    }

    /// 指定座標上的存活單位
    pub fn unit_at(&self, pos: Pos) -> Option<&Unit> {
        self.board
            .occupant_at(pos)
            .and_then(|id| self.units.get(id))
            .filter(|u| u.is_alive())
    }

    /// 玩家的存活單位，依建立順序（即動作空間的 slot 順序）
    pub fn live_units_of(&self, player: PlayerID) -> impl Iterator<Item = &Unit> + '_ {
        self.units
            .iter()
            .filter(move |u| u.owner == player && u.is_alive())
    }

    pub fn live_count(&self, player: PlayerID) -> usize {
        self.live_units_of(player).count()
    }

    /// 移動單位並同步棋盤，不做規則檢查
    pub(crate) fn relocate(&mut self, unit_id: UnitID, to: Pos) -> Result<()> {
        let from = self
            .unit(unit_id)
            .map(|u| u.pos)
            .ok_or(BoardError::UnknownUnit { unit_id })?;
        self.board.relocate(unit_id, from, to)?;
        if let Some(unit) = self.unit_mut(unit_id) {
            unit.pos = to;
        }
        Ok(())
    }

    /// 對單位造成傷害，陣亡時立即從棋盤移除；回傳是否擊殺
    pub(crate) fn apply_damage(&mut self, unit_id: UnitID, damage: Hp) -> Result<bool> {
        let unit = self
            .unit_mut(unit_id)
            .ok_or(BoardError::UnknownUnit { unit_id })?;
        let killed = unit.take_damage(damage);
        let pos = unit.pos;
        if killed {
            self.board.vacate(unit_id, pos)?;
        }
        Ok(killed)
    }

    /// 重置所有存活單位的本回合旗標
    pub(crate) fn reset_turn_flags(&mut self) {
        for unit in self.units.iter_mut().filter(|u| u.is_alive()) {
            unit.reset_turn();
        }
    }

    /// 檢查佔據一致性：
    /// - 每個存活單位所在格的佔據者就是它自己
    /// - 每個格子的佔據者都是存活單位，且座標相符
    /// - 陣亡單位不佔據任何格子
    pub fn check_invariants(&self) -> Result<()> {
        for unit in &self.units {
            if unit.is_alive() && self.board.occupant_at(unit.pos) != Some(unit.id) {
                return Err(BoardError::UnitNotAtPos {
                    unit_id: unit.id,
                    pos: unit.pos,
                }
                .into());
            }
        }
        for pos in self.board.positions() {
            let Some(occupant) = self.board.occupant_at(pos) else {
                continue;
            };
            match self.units.get(occupant) {
                Some(unit) if unit.is_alive() && unit.pos == pos => {}
                _ => {
                    return Err(BoardError::UnitNotAtPos {
                        unit_id: occupant,
                        pos,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }
}
