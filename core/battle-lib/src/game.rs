//! game.rs：
//! - 對局控制器：擁有棋盤、單位、回合與延遲砲擊佇列。
//! - 一步 = 取得合法動作 → 策略選一個索引 → 解碼 → 套用 → 計算回饋 → 判定勝負 → 換手。
//! - 策略只透過動作索引影響對局，快照是唯讀的。
use crate::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// 單步結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub player: PlayerID,
    pub action: Action,
    /// 動作被拒絕（解碼為 NoOp 或不合法）時為 false
    pub applied: bool,
    /// 延遲攻擊在排程當下就給回饋，以當時盤面預估的命中計算，
    /// 落地時的實際結果不再回頭修正
    pub reward: RewardValue,
    pub outcome: Outcome,
}

/// 給策略或外部編碼器的唯讀快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: Coord,
    pub height: Coord,
    /// 列優先，長度 width * height
    pub terrain: Vec<TerrainKind>,
    pub units: Vec<Unit>,
    pub current_player: PlayerID,
    pub turn: TurnCount,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct Match {
    config: MatchConfig,
    rng: ChaCha8Rng,
    battlefield: Battlefield,
    sequencer: TurnSequencer,
    space: ActionSpace,
    pending: Vec<PendingStrike>,
    outcome: Outcome,
}

impl Match {
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        let mut this = Self {
            space: ActionSpace::new(config.width, config.height, config.unit_slots),
            battlefield: Battlefield::new(Board::uniform(config.width, config.height, TerrainKind::Flat)?),
            sequencer: TurnSequencer::default(),
            pending: Vec::new(),
            outcome: Outcome::Ongoing,
            config,
            rng,
        };
        this.reset()?;
        Ok(this)
    }

    /// 重建棋盤與所有單位，不沿用上一場的任何狀態
    ///
    /// 亂數產生器不重新播種，同一個 Match 連續 reset 會得到不同地形。
    pub fn reset(&mut self) -> Result<()> {
        let board = match self.config.terrain_rows()? {
            Some(rows) => Board::from_terrain_rows(rows)?,
            None => Board::generate(self.config.width, self.config.height, &mut self.rng)?,
        };
        let mut battlefield = Battlefield::new(board);
        for d in &self.config.deployment {
            battlefield.spawn(d.kind, d.owner, d.pos)?;
        }
        self.battlefield = battlefield;
        self.sequencer = TurnSequencer::default();
        self.pending.clear();
        self.outcome = evaluate_victory(&self.battlefield, 0, self.config.max_turns);
        tracing::debug!(units = self.battlefield.units().len(), "match reset");
        Ok(())
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn action_space(&self) -> ActionSpace {
        self.space
    }

    pub fn current_player(&self) -> PlayerID {
        self.sequencer.current_player().unwrap_or_default()
    }

    pub fn turn_count(&self) -> TurnCount {
        self.sequencer.turn_count()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// 尚未落地的延遲砲擊
    pub fn pending_strikes(&self) -> &[PendingStrike] {
        &self.pending
    }

    pub fn legal_actions(&self) -> Vec<ActionIndex> {
        self.space
            .legal_actions(&self.battlefield, self.current_player())
    }

    pub fn decode(&self, index: ActionIndex) -> Action {
        self.space
            .decode(&self.battlefield, self.current_player(), index)
    }

    /// 執行一步
    ///
    /// 不合法或過期的索引視為 NoOp：回饋為 0，照樣換手。
    /// 對局結束後呼叫不會改動任何狀態。
    pub fn step(&mut self, index: ActionIndex) -> StepResult {
        let player = self.current_player();
        let action = self.decode(index);
        if self.is_over() {
            return StepResult {
                player,
                action,
                applied: false,
                reward: 0.0,
                outcome: self.outcome,
            };
        }

        let (applied, reward) = match action {
            Action::NoOp => (false, 0.0),
            _ => match self.apply(player, action) {
                Ok(reward) => (true, reward),
                Err(err) => {
                    tracing::debug!(player, index, %err, "action rejected");
                    (false, 0.0)
                }
            },
        };

        self.outcome = evaluate_victory(&self.battlefield, self.turn_count(), self.config.max_turns);
        if !self.is_over() {
            self.advance();
        }
        if self.is_over() {
            tracing::info!(
                outcome = ?self.outcome,
                turn = self.turn_count(),
                alive0 = self.battlefield.live_count(0),
                alive1 = self.battlefield.live_count(1),
                "match finished"
            );
        }

        StepResult {
            player,
            action,
            applied,
            reward,
            outcome: self.outcome,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let board = self.battlefield.board();
        Snapshot {
            width: board.width(),
            height: board.height(),
            terrain: board
                .positions()
                .map(|pos| board.terrain_at(pos).unwrap_or_default())
                .collect(),
            units: self.battlefield.units().to_vec(),
            current_player: self.current_player(),
            turn: self.turn_count(),
            outcome: self.outcome,
        }
    }

    fn apply(&mut self, player: PlayerID, action: Action) -> Result<RewardValue> {
        let func = "Match::apply";

        match action {
            Action::Move { unit, target } => {
                move_unit(&mut self.battlefield, unit, target).context(func)?;
                Ok(self.config.reward.move_reward(&self.battlefield, player, target))
            }
            Action::Attack { unit, target } => {
                match attack(&mut self.battlefield, unit, target).context(func)? {
                    AttackOutcome::Resolved(hits) => Ok(self.config.reward.hit_reward(&hits)),
                    AttackOutcome::Scheduled(strike) => {
                        // 預估值，目標在落地前離開或改站掩護時不修正
                        let projected = preview_hits(&self.battlefield, &strike);
                        self.pending.push(strike);
                        Ok(self.config.reward.hit_reward(&projected))
                    }
                }
            }
            Action::NoOp => Ok(0.0),
        }
    }

    /// 換手，並在新玩家回合開始時結算其延遲砲擊
    fn advance(&mut self) {
        self.sequencer.advance(&mut self.battlefield);
        let player = self.current_player();

        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|strike| strike.owner == player);
        self.pending = waiting;
        for strike in due {
            match resolve_strike(&mut self.battlefield, &strike) {
                Ok(hits) => {
                    tracing::debug!(attacker = strike.attacker, target = %strike.target, hits = hits.len(), "strike landed");
                }
                Err(err) => tracing::warn!(%err, "strike failed to resolve"),
            }
        }

        self.outcome = evaluate_victory(&self.battlefield, self.turn_count(), self.config.max_turns);
    }
}
