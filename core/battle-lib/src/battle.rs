//! battle.rs：
//! - 負責回合輪替與勝負判定。
//! - 回合數只在輪回第一位玩家時 +1，單一動作不會推進回合數。
//! - 不負責動作合法性、傷害計算與延遲砲擊結算。
use crate::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSequencer {
    players: Vec<PlayerID>,
    current_index: usize,
    turn_count: TurnCount,
}

impl Default for TurnSequencer {
    fn default() -> Self {
        Self::new(PLAYERS.to_vec())
    }
}

impl TurnSequencer {
    pub fn new(players: Vec<PlayerID>) -> Self {
        Self {
            players,
            current_index: 0,
            turn_count: 0,
        }
    }

    pub fn current_player(&self) -> Option<PlayerID> {
        self.players.get(self.current_index).copied()
    }

    pub fn turn_count(&self) -> TurnCount {
        self.turn_count
    }

    /// 換下一位玩家並重置所有存活單位的旗標；回傳是否繞回第一位玩家
    pub fn advance(&mut self, battlefield: &mut Battlefield) -> bool {
        if self.players.is_empty() {
            return false;
        }
        self.current_index = (self.current_index + 1) % self.players.len();
        let wrapped = self.current_index == 0;
        if wrapped {
            self.turn_count += 1;
        }
        battlefield.reset_turn_flags();
        tracing::debug!(
            player = self.players[self.current_index],
            turn = self.turn_count,
            "turn advanced"
        );
        wrapped
    }
}

/// 對局狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Outcome {
    #[default]
    Ongoing,
    Winner(PlayerID),
    Draw,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// 勝負判定：
/// - 殲滅：一方無存活單位即敗，雙方同時全滅為平手
/// - 回合上限：存活單位多者勝，相同為平手
pub fn evaluate_victory(
    battlefield: &Battlefield,
    turn_count: TurnCount,
    max_turns: TurnCount,
) -> Outcome {
    let [first, second] = PLAYERS;
    let first_alive = battlefield.live_count(first);
    let second_alive = battlefield.live_count(second);

    match (first_alive, second_alive) {
        (0, 0) => return Outcome::Draw,
        (0, _) => return Outcome::Winner(second),
        (_, 0) => return Outcome::Winner(first),
        _ => {}
    }
    if turn_count < max_turns {
        return Outcome::Ongoing;
    }
    match first_alive.cmp(&second_alive) {
        std::cmp::Ordering::Greater => Outcome::Winner(first),
        std::cmp::Ordering::Less => Outcome::Winner(second),
        std::cmp::Ordering::Equal => Outcome::Draw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepare(units: &[(UnitKind, PlayerID, Pos)]) -> Battlefield {
        let mut bf = Battlefield::new(Board::uniform(6, 6, TerrainKind::Flat).unwrap());
        for (kind, owner, pos) in units {
            bf.spawn(*kind, *owner, *pos).unwrap();
        }
        bf
    }

    #[test]
    fn test_sequencer_empty() {
        let mut bf = prepare(&[]);
        let mut seq = TurnSequencer::new(vec![]);
        assert_eq!(seq.current_player(), None);
        assert!(!seq.advance(&mut bf));
        assert_eq!(seq.turn_count(), 0);
    }

    #[test]
    fn test_turn_count_per_rotation() {
        let mut bf = prepare(&[]);
        let mut seq = TurnSequencer::default();
        assert_eq!(seq.current_player(), Some(0));
        // (advance 後的玩家, 是否繞回, 回合數)
        let test_data = [(1, false, 0), (0, true, 1), (1, false, 1), (0, true, 2)];
        for (player, wrapped, turn) in test_data {
            assert_eq!(seq.advance(&mut bf), wrapped);
            assert_eq!(seq.current_player(), Some(player));
            assert_eq!(seq.turn_count(), turn);
        }
    }

    #[test]
    fn test_advance_resets_flags() {
        let mut bf = prepare(&[
            (UnitKind::Tank, 0, Pos::new(0, 0)),
            (UnitKind::Tank, 1, Pos::new(5, 5)),
        ]);
        for id in 0..2 {
            let unit = bf.unit_mut(id).unwrap();
            unit.has_moved = true;
            unit.has_attacked = true;
        }
        let mut seq = TurnSequencer::default();
        seq.advance(&mut bf);
        for unit in bf.units() {
            assert!(!unit.has_moved, "{}", unit.id);
            assert!(!unit.has_attacked, "{}", unit.id);
        }
    }

    #[test]
    fn test_evaluate_victory() {
        let tank = UnitKind::Tank;
        let test_data = [
            // (玩家 0 存活, 玩家 1 存活, 回合數, 預期)
            (2, 1, 10, Outcome::Ongoing),
            (2, 0, 10, Outcome::Winner(0)),
            (0, 1, 10, Outcome::Winner(1)),
            (0, 0, 10, Outcome::Draw),
            (2, 1, 200, Outcome::Winner(0)),
            (1, 2, 250, Outcome::Winner(1)),
            (2, 2, 200, Outcome::Draw),
            (2, 2, 199, Outcome::Ongoing),
        ];
        for (alive0, alive1, turn, expected) in test_data {
            let mut units = Vec::new();
            for i in 0..3 {
                units.push((tank, 0, Pos::new(i, 0)));
                units.push((tank, 1, Pos::new(i, 5)));
            }
            let mut bf = prepare(&units);
            // 偶數 id 屬於玩家 0，奇數屬於玩家 1
            for i in alive0..3 {
                bf.apply_damage(i * 2, 5).unwrap();
            }
            for i in alive1..3 {
                bf.apply_damage(i * 2 + 1, 5).unwrap();
            }
            assert_eq!(
                evaluate_victory(&bf, turn, 200),
                expected,
                "{alive0} vs {alive1} at turn {turn}"
            );
        }
    }
}
