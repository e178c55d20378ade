//! UCI command and reply vocabulary
//!
//! Literal tokens exchanged with the engine. Changing any sentinel here
//! changes what the handshake and the legality scrape wait for.

use crate::game::moves::MoveToken;

pub const CMD_UCI: &str = "uci";
pub const CMD_IS_READY: &str = "isready";
pub const CMD_NEW_GAME: &str = "ucinewgame";
pub const CMD_PERFT_ONE_PLY: &str = "go perft 1";
pub const CMD_QUIT: &str = "quit";

/// Identification round complete
pub const SENTINEL_UCI_OK: &str = "uciok";
/// Readiness round complete
pub const SENTINEL_READY_OK: &str = "readyok";
/// Last line of a `go perft` listing
pub const SENTINEL_PERFT_DONE: &str = "Nodes searched";
/// Search finished; followed by the chosen move
pub const SENTINEL_BEST_MOVE: &str = "bestmove";

/// Moves the engine reports when it has nothing to play
const NULL_MOVES: [&str; 2] = ["(none)", "0000"];

/// `position startpos [moves …]` for the given history
pub fn position_command<'a, I>(moves: I) -> String
where
    I: IntoIterator<Item = &'a MoveToken>,
{
    let mut command = String::from("position startpos");
    let mut first = true;
    for token in moves {
        if first {
            command.push_str(" moves");
            first = false;
        }
        command.push(' ');
        command.push_str(token.as_str());
    }
    command
}

pub fn go_depth_command(depth: u32) -> String {
    format!("go depth {depth}")
}

pub fn set_option_command(name: &str, value: &str) -> String {
    format!("setoption name {name} value {value}")
}

/// Engine's answer to a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    Move {
        best: MoveToken,
        ponder: Option<MoveToken>,
    },
    /// `bestmove (none)`: the side to move has no legal move
    NoMove,
}

/// Find the last `bestmove` line in `transcript`
///
/// Returns `None` when no `bestmove` line is present or when the token after
/// it is not a move. Lines are matched on their first word, so `info` lines
/// mentioning other words never match.
pub fn parse_best_move(transcript: &str) -> Option<BestMove> {
    let line = transcript
        .lines()
        .rev()
        .find(|line| line.split_whitespace().next() == Some(SENTINEL_BEST_MOVE))?;

    let mut words = line.split_whitespace().skip(1);
    let best = words.next()?;
    if NULL_MOVES.contains(&best) {
        return Some(BestMove::NoMove);
    }
    let best = MoveToken::parse(best).ok()?;

    let ponder = match (words.next(), words.next()) {
        (Some("ponder"), Some(token)) => MoveToken::parse(token).ok(),
        _ => None,
    };
    Some(BestMove::Move { best, ponder })
}

/// Engine name from an `id name …` line of the handshake transcript
pub fn parse_engine_name(transcript: &str) -> Option<String> {
    transcript
        .lines()
        .find_map(|line| line.trim().strip_prefix("id name "))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
