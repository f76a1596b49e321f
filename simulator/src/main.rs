//! 戰棋模擬器
//!
//! - play：單場對局，逐步印出文字棋盤
//! - batch：連續多場對局並統計勝率，不做任何學習
mod display;

use anyhow::{Context, Result};
use battle_lib::{
    Match, MatchConfig, MatchSummary, Outcome, Policy, RandomPolicy, RewardValue, ScriptedPolicy,
    TurnCount, run_match,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "兩人回合制戰棋模擬：自我對戰與文字棋盤")]
struct Args {
    /// 對局設定檔（TOML），省略時使用標準對局
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 亂數種子，覆寫設定檔中的 seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// 回合上限，覆寫設定檔中的 max_turns
    #[arg(long, global = true)]
    max_turns: Option<TurnCount>,

    #[arg(long, value_enum, default_value_t = PolicyKind::Scripted, global = true)]
    policy0: PolicyKind,

    #[arg(long, value_enum, default_value_t = PolicyKind::Random, global = true)]
    policy1: PolicyKind,

    /// 單場對局的步數上限（外部驅動迴圈的保險）
    #[arg(long, default_value_t = 5000, global = true)]
    step_cap: usize,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// 單場對局，逐步印出棋盤
    Play {
        /// 每幾步印一次棋盤
        #[arg(long, default_value_t = 1)]
        every: usize,

        /// 對局結束後把快照寫成 JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// 連續多場對局並統計勝率
    Batch {
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// 以 JSON 輸出統計
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    Random,
    Scripted,
}

fn build_policy(kind: PolicyKind, seed: u64) -> Box<dyn Policy> {
    match kind {
        PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        PolicyKind::Scripted => Box::new(ScriptedPolicy),
    }
}

#[derive(Debug, Default, Serialize)]
struct BatchReport {
    seed: u64,
    games: usize,
    wins: [usize; 2],
    draws: usize,
    unfinished: usize,
    average_turns: f32,
    average_rewards: [RewardValue; 2],
}

impl BatchReport {
    fn record(&mut self, summary: &MatchSummary) {
        self.games += 1;
        match summary.outcome {
            Outcome::Winner(player) => {
                if let Some(wins) = self.wins.get_mut(player) {
                    *wins += 1;
                }
            }
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => self.unfinished += 1,
        }
        // 累計平均
        let n = self.games as f32;
        self.average_turns += (summary.turns as f32 - self.average_turns) / n;
        for (avg, reward) in self.average_rewards.iter_mut().zip(summary.rewards) {
            *avg += (reward - *avg) / n;
        }
    }

    fn win_rate(&self, player: usize) -> f32 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(player).copied().unwrap_or_default() as f32 / self.games as f32
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    tracing::info!(seed, width = config.width, height = config.height, "match config loaded");

    let mut policies = [
        build_policy(args.policy0, seed),
        build_policy(args.policy1, seed.wrapping_add(1)),
    ];
    let mut game = Match::new(config).context("建立對局失敗")?;

    match args.mode {
        Mode::Play { every, snapshot } => {
            play(&mut game, &mut policies, args.step_cap, every.max(1))?;
            if let Some(path) = snapshot {
                let json = serde_json::to_string_pretty(&game.snapshot())?;
                std::fs::write(&path, json)
                    .with_context(|| format!("寫入快照失敗: {}", path.display()))?;
                tracing::info!(path = %path.display(), "snapshot written");
            }
        }
        Mode::Batch { games, json } => {
            let report = batch(&mut game, &mut policies, args.step_cap, games, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} 場：玩家 0 勝 {} ({:.1}%)，玩家 1 勝 {} ({:.1}%)，平手 {}，未結束 {}",
                    report.games,
                    report.wins[0],
                    report.win_rate(0) * 100.0,
                    report.wins[1],
                    report.win_rate(1) * 100.0,
                    report.draws,
                    report.unfinished
                );
                println!(
                    "平均回合 {:.1}，平均回饋 {:.1} / {:.1}",
                    report.average_turns, report.average_rewards[0], report.average_rewards[1]
                );
            }
        }
    }
    Ok(())
}

fn play(
    game: &mut Match,
    policies: &mut [Box<dyn Policy>; 2],
    step_cap: usize,
    every: usize,
) -> Result<()> {
    println!("{}\n", display::render(game));
    let mut steps = 0;
    while !game.is_over() && steps < step_cap {
        let player = game.current_player();
        let legal = game.legal_actions();
        let policy = policies
            .get_mut(player)
            .with_context(|| format!("玩家 {player} 沒有策略"))?;
        let index = policy.choose(game, &legal);
        let result = game.step(index);
        steps += 1;

        if steps % every == 0 || game.is_over() {
            println!(
                "第 {steps} 步 玩家 {} [{}] {:?} 回饋 {:.1}{}",
                result.player,
                policy.name(),
                result.action,
                result.reward,
                if result.applied { "" } else { "（未執行）" }
            );
            println!("{}\n", display::render(game));
        }
    }
    println!("{}", display::describe_outcome(game.outcome()));
    Ok(())
}

fn batch(
    game: &mut Match,
    policies: &mut [Box<dyn Policy>; 2],
    step_cap: usize,
    games: usize,
    seed: u64,
) -> Result<BatchReport> {
    let mut report = BatchReport {
        seed,
        ..Default::default()
    };
    let [p0, p1] = policies;
    for i in 0..games {
        if i > 0 {
            game.reset()?;
        }
        let summary = run_match(game, &mut [p0.as_mut(), p1.as_mut()], step_cap);
        tracing::debug!(game = i, outcome = ?summary.outcome, turns = summary.turns, "game finished");
        report.record(&summary);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "simulator",
            "batch",
            "--games",
            "3",
            "--seed",
            "7",
            "--policy0",
            "random",
        ]);
        assert_eq!(args.seed, Some(7));
        assert!(matches!(args.policy0, PolicyKind::Random));
        assert!(matches!(args.policy1, PolicyKind::Random));
        assert!(matches!(args.mode, Mode::Batch { games: 3, json: false }));
    }

    #[test]
    fn test_batch_report() {
        let mut game = Match::new(MatchConfig {
            seed: Some(3),
            max_turns: 20,
            ..Default::default()
        })
        .unwrap();
        let mut policies = [build_policy(PolicyKind::Scripted, 3), build_policy(PolicyKind::Random, 4)];
        let report = batch(&mut game, &mut policies, 1000, 4, 3).unwrap();
        assert_eq!(report.games, 4);
        assert_eq!(report.wins[0] + report.wins[1] + report.draws + report.unfinished, 4);
        assert!(report.average_turns <= 20.0);
    }

    #[test]
    fn test_record_averages() {
        let mut report = BatchReport::default();
        let summary = |outcome, turns, rewards| MatchSummary {
            outcome,
            steps: 0,
            turns,
            rewards,
            survivors: [0, 0],
        };
        report.record(&summary(Outcome::Winner(0), 10, [100.0, 0.0]));
        report.record(&summary(Outcome::Draw, 20, [0.0, 50.0]));
        assert_eq!(report.wins, [1, 0]);
        assert_eq!(report.draws, 1);
        assert_eq!(report.average_turns, 15.0);
        assert_eq!(report.average_rewards, [50.0, 25.0]);
        assert_eq!(report.win_rate(0), 0.5);
    }
}
