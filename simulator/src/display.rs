//! 文字棋盤：地形符號打底，單位符號覆蓋其上
use battle_lib::{Match, Outcome, PLAYERS, Pos};
use std::fmt::Write;

pub fn render(game: &Match) -> String {
    let battlefield = game.battlefield();
    let board = battlefield.board();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "回合 {} / {}，輪到玩家 {}",
        game.turn_count(),
        game.config().max_turns,
        game.current_player()
    );
    for y in 0..board.height() {
        let line: Vec<String> = (0..board.width())
            .map(|x| {
                let pos = Pos::new(x, y);
                let symbol = match battlefield.unit_at(pos) {
                    Some(unit) => unit.kind.symbol(unit.owner),
                    None => board.terrain_at(pos).unwrap_or_default().symbol(),
                };
                symbol.to_string()
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    let counts: Vec<String> = PLAYERS
        .iter()
        .map(|&p| format!("玩家 {p}: {} 單位", battlefield.live_count(p)))
        .collect();
    let _ = write!(out, "{}", counts.join("  "));
    if !game.pending_strikes().is_empty() {
        let _ = write!(out, "  待落地砲擊: {}", game.pending_strikes().len());
    }
    out
}

pub fn describe_outcome(outcome: Outcome) -> String {
    match outcome {
        Outcome::Ongoing => "對局未結束".to_string(),
        Outcome::Winner(player) => format!("玩家 {player} 獲勝"),
        Outcome::Draw => "平手".to_string(),
    }
}
