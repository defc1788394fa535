//! Go Text Protocol (GTP) style front-end.
//!
//! The engine speaks the GTP framing (`=id response` / `?id error`, blank line
//! after each reply) with the five-in-a-row command set used by GUI tools such
//! as GoGui.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`
//! - `quit` - Exit the command loop
//! - `boardsize <size>` - Start a new empty board of the given size
//! - `clear_board` - Reset the board to empty
//! - `play <color> <vertex>` - Place a stone
//! - `genmove <color>` - Solve the position, then play and report a move
//! - `solve` - Report `b|w|draw [vertex]` for the side to move
//! - `policy_moves` - List the rule-based candidate moves
//! - `simulate [n]` - Flat Monte Carlo move choice with `n` rollouts per move
//! - `legal_moves` - List empty points
//! - `showboard` - Print the board
//! - `gogui-rules_final_result` - `black`, `white`, `draw`, or `unknown`

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::board::{Board, Color};
use crate::error::GtpError;
use crate::patterns::policy_moves;
use crate::playout::simulate_moves;
use crate::search::{SearchConfig, Solver, Verdict};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "gogui-rules_final_result",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "policy_moves",
    "protocol_version",
    "quit",
    "showboard",
    "simulate",
    "solve",
    "version",
];

/// Rollouts per move for `simulate` without an argument.
const DEFAULT_SIMULATIONS: usize = 10;

/// GTP engine state.
pub struct GtpEngine {
    board: Board,
    solver: Solver,
}

impl GtpEngine {
    /// Create an engine with an empty board of `size`.
    pub fn new(size: usize, config: SearchConfig) -> Result<Self, GtpError> {
        Ok(Self {
            board: Board::new(size)?,
            solver: Solver::new(config),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        info!(size = self.board.size(), "gtp session started");
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(err) => {
                    warn!(command = %command, error = %err, "command failed");
                    ('?', err.to_string())
                }
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        info!("gtp session ended");
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return its response text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String, GtpError> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),
            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),
            "protocol_version" => Ok("2".to_string()),
            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),
            "known_command" => {
                let cmd = args.first().ok_or(GtpError::MissingArgument)?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }
            "quit" => Ok(String::new()),
            "boardsize" => {
                let arg = args.first().ok_or(GtpError::MissingArgument)?;
                let size = arg
                    .parse::<usize>()
                    .map_err(|_| GtpError::InvalidSize(arg.to_string()))?;
                self.board = Board::new(size)?;
                Ok(String::new())
            }
            "clear_board" => {
                self.board.clear();
                Ok(String::new())
            }
            "play" => {
                let (color, vertex) = match args {
                    [color, vertex, ..] => (*color, *vertex),
                    _ => return Err(GtpError::MissingArgument),
                };
                let color = parse_color(color)?;
                let pt = self
                    .board
                    .parse_point(vertex)
                    .ok_or_else(|| GtpError::InvalidPoint(vertex.to_string()))?;
                self.board.play(pt, color)?;
                Ok(String::new())
            }
            "genmove" => {
                let color = parse_color(args.first().ok_or(GtpError::MissingArgument)?)?;
                self.genmove(color)
            }
            "solve" => {
                let solution = self.solver.solve(&mut self.board);
                Ok(solution.display(&self.board).to_string())
            }
            "policy_moves" => {
                let (tier, moves) = policy_moves(&self.board);
                let mut coords: Vec<String> =
                    moves.iter().map(|&pt| self.board.format_point(pt)).collect();
                coords.sort();
                Ok(format!("{} {}", tier.label(), coords.join(" ")))
            }
            "simulate" => {
                let n = match args.first() {
                    Some(arg) => arg
                        .parse::<usize>()
                        .map_err(|_| GtpError::InvalidNumber(arg.to_string()))?,
                    None => DEFAULT_SIMULATIONS,
                };
                let best = simulate_moves(&mut self.board, n, self.solver.rng());
                Ok(best
                    .map(|(pt, rate)| format!("{} {rate:.2}", self.board.format_point(pt)))
                    .unwrap_or_default())
            }
            "legal_moves" => {
                if self.board.check_terminal().is_some() {
                    return Ok(String::new());
                }
                let mut coords: Vec<String> = self
                    .board
                    .empty_points()
                    .into_iter()
                    .map(|pt| self.board.format_point(pt))
                    .collect();
                coords.sort();
                Ok(coords.join(" "))
            }
            "showboard" => Ok(format!("\n{}", self.board)),
            "gogui-rules_final_result" => Ok(match self.board.check_terminal() {
                Some(Color::Black) => "black",
                Some(Color::White) => "white",
                None if self.board.count_empty() == 0 => "draw",
                None => "unknown",
            }
            .to_string()),
            _ => Err(GtpError::UnknownCommand(command.to_string())),
        }
    }

    /// Pick a move for `color` and play it.
    ///
    /// The solver's move is used when it has one; a lost position falls back
    /// to the highest ranked move so the game can continue.
    fn genmove(&mut self, color: Color) -> Result<String, GtpError> {
        if let Some(winner) = self.board.check_terminal() {
            return Ok(if winner == color { "pass" } else { "resign" }.to_string());
        }
        self.board.set_current_player(color);
        let solution = self.solver.solve(&mut self.board);
        let chosen = solution
            .best_move
            .or_else(|| self.solver.rank(&mut self.board).best().map(|m| m.point));
        let Some(pt) = chosen else {
            self.board.play_pass();
            return Ok("pass".to_string());
        };
        if solution.verdict == Verdict::Win(color.opponent()) {
            info!(color = %color, "position is lost, playing best ranked move");
        }
        self.board.play(pt, color)?;
        Ok(self.board.format_point(pt))
    }
}

fn parse_color(s: &str) -> Result<Color, GtpError> {
    Color::parse(s).ok_or_else(|| GtpError::InvalidColor(s.to_string()))
}
