use crate::*;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// 策略：從合法動作索引中挑一個
///
/// 引擎不在意索引怎麼選出來的，人類、腳本或學習模型都走同一個介面。
pub trait Policy {
    fn name(&self) -> &str;
    fn choose(&mut self, game: &Match, legal: &[ActionIndex]) -> ActionIndex;
}

/// 均勻隨機挑選
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, _game: &Match, legal: &[ActionIndex]) -> ActionIndex {
        legal.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ScoredAction {
    pub index: ActionIndex,
    pub action: Action,
    pub score: i32,
    pub reason: String, // for debug purpose
}

/// 腳本策略：擊殺 > 傷害 > 接近敵人 > 佔據有利地形
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy;

impl Policy for ScriptedPolicy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn choose(&mut self, game: &Match, legal: &[ActionIndex]) -> ActionIndex {
        let mut scored: Vec<ScoredAction> = legal
            .iter()
            .map(|&index| score(game, index))
            .collect();

        // 同分時取索引較小者，結果可重現
        scored.sort_by(|a, b| b.score.cmp(&a.score).then(a.index.cmp(&b.index)));
        match scored.into_iter().next() {
            Some(best) => {
                tracing::trace!(index = best.index, score = best.score, reason = %best.reason, "scripted choice");
                best.index
            }
            None => 0,
        }
    }
}

use inner::*;
mod inner {
    use super::*;

    const KILL_SCORE: i32 = 100;
    const DAMAGE_SCORE: i32 = 10;
    const APPROACH_SCORE: i32 = 5;
    const COVER_SCORE: i32 = 2;

    pub fn score(game: &Match, index: ActionIndex) -> ScoredAction {
        let battlefield = game.battlefield();
        let action = game.decode(index);
        let (score, reason) = match action {
            Action::Attack { unit, target } => score_attack(battlefield, unit, target),
            Action::Move { unit, target } => score_move(battlefield, unit, target),
            Action::NoOp => (i32::MIN, "no-op".to_string()),
        };
        ScoredAction {
            index,
            action,
            score,
            reason,
        }
    }

    fn score_attack(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> (i32, String) {
        let Some(unit) = battlefield.unit(unit_id) else {
            return (i32::MIN, "unknown unit".to_string());
        };
        let stats = unit.stats();
        let strike = PendingStrike {
            attacker: unit_id,
            owner: unit.owner,
            attack_power: stats.attack_power,
            is_area_effect: stats.is_area_effect,
            target,
        };
        let hits = preview_hits(battlefield, &strike);
        let damage: i32 = hits.iter().map(|h| h.damage).sum();
        let kills = hits.iter().filter(|h| h.killed).count() as i32;
        (
            kills * KILL_SCORE + damage * DAMAGE_SCORE + 1,
            format!("attack {target}: damage {damage}, kills {kills}"),
        )
    }

    fn score_move(battlefield: &Battlefield, unit_id: UnitID, target: Pos) -> (i32, String) {
        let Some(unit) = battlefield.unit(unit_id) else {
            return (i32::MIN, "unknown unit".to_string());
        };
        let board = battlefield.board();
        let nearest = |from: Pos| {
            battlefield
                .units()
                .iter()
                .filter(|u| u.owner != unit.owner && u.is_alive())
                .map(|u| board.distance(from, u.pos) as i32)
                .min()
                .unwrap_or(0)
        };
        let approach = nearest(unit.pos) - nearest(target);
        let cover = match board.terrain_at(target) {
            Some(terrain) if terrain.is_defensive() => COVER_SCORE,
            _ => 0,
        };
        (
            approach * APPROACH_SCORE + cover,
            format!("move {} -> {target}: approach {approach}", unit.pos),
        )
    }
}

/// 一場對局的統計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub outcome: Outcome,
    pub steps: usize,
    pub turns: TurnCount,
    pub rewards: [RewardValue; 2],
    pub survivors: [usize; 2],
}

/// 讓兩個策略對戰直到分出勝負，或達到呼叫端給的步數上限
pub fn run_match(game: &mut Match, policies: &mut [&mut dyn Policy; 2], step_cap: usize) -> MatchSummary {
    let mut rewards = [0.0; 2];
    let mut steps = 0;
    while !game.is_over() && steps < step_cap {
        let player = game.current_player();
        let legal = game.legal_actions();
        let Some(policy) = policies.get_mut(player) else {
            break;
        };
        let index = policy.choose(game, &legal);
        let result = game.step(index);
        if let Some(total) = rewards.get_mut(result.player) {
            *total += result.reward;
        }
        steps += 1;
    }
    MatchSummary {
        outcome: game.outcome(),
        steps,
        turns: game.turn_count(),
        rewards,
        survivors: PLAYERS.map(|p| game.battlefield().live_count(p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duel_config() -> MatchConfig {
        MatchConfig {
            width: 6,
            height: 6,
            max_turns: 30,
            seed: Some(5),
            terrain: Some(vec![".".repeat(6); 6]),
            deployment: vec![
                Deployment::new(UnitKind::Tank, 0, 0, 0),
                Deployment::new(UnitKind::SoldierSquad, 1, 0, 3),
                Deployment::new(UnitKind::SoldierSquad, 1, 5, 5),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_random_policy_picks_legal_index() {
        let game = Match::new(duel_config()).unwrap();
        let legal = game.legal_actions();
        let mut policy = RandomPolicy::new(1);
        for _ in 0..20 {
            assert!(legal.contains(&policy.choose(&game, &legal)));
        }
        assert_eq!(policy.choose(&game, &[]), 0);
    }

    #[test]
    fn test_random_policy_is_seeded() {
        let game = Match::new(duel_config()).unwrap();
        let legal = game.legal_actions();
        let mut a = RandomPolicy::new(8);
        let mut b = RandomPolicy::new(8);
        for _ in 0..10 {
            assert_eq!(a.choose(&game, &legal), b.choose(&game, &legal));
        }
    }

    #[test]
    fn test_scripted_policy_prefers_kill() {
        let game = Match::new(duel_config()).unwrap();
        let legal = game.legal_actions();
        let index = ScriptedPolicy.choose(&game, &legal);
        assert_eq!(
            game.decode(index),
            Action::Attack {
                unit: 0,
                target: Pos::new(0, 3)
            }
        );
    }

    #[test]
    fn test_scripted_policy_closes_distance() {
        let game = Match::new(MatchConfig {
            deployment: vec![
                Deployment::new(UnitKind::SoldierSquad, 0, 0, 0),
                Deployment::new(UnitKind::SoldierSquad, 1, 5, 5),
            ],
            ..duel_config()
        })
        .unwrap();
        let legal = game.legal_actions();
        let index = ScriptedPolicy.choose(&game, &legal);
        let Action::Move { target, .. } = game.decode(index) else {
            panic!("nothing in range, expected a move");
        };
        assert_eq!(game.battlefield().board().distance(target, Pos::new(5, 5)), 9);
    }

    #[test]
    fn test_run_match_scripted_vs_random() {
        let mut game = Match::new(duel_config()).unwrap();
        let mut p0 = ScriptedPolicy;
        let mut p1 = RandomPolicy::new(2);
        let summary = run_match(&mut game, &mut [&mut p0, &mut p1], 1000);
        assert!(summary.outcome.is_over());
        assert!(summary.turns <= 30);
        assert_eq!(summary.survivors, [game.battlefield().live_count(0), game.battlefield().live_count(1)]);
        assert!(summary.rewards[0] > 0.0);
    }

    #[test]
    fn test_run_match_respects_step_cap() {
        let mut game = Match::new(MatchConfig {
            seed: Some(4),
            ..Default::default()
        })
        .unwrap();
        let mut p0 = RandomPolicy::new(1);
        let mut p1 = RandomPolicy::new(2);
        let summary = run_match(&mut game, &mut [&mut p0, &mut p1], 3);
        assert_eq!(summary.steps, 3);
        assert_eq!(summary.outcome, Outcome::Ongoing);
    }
}
