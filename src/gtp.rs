//! Go Text Protocol (GTP) front end.
//!
//! Lets the engine be driven by GTP controllers such as Sabaki or GoGui.
//! Every command goes through a [`GameSession`], so legality, history and
//! scoring behave exactly as they do for any other caller.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <size>` - Start a new game on a board of the given size (5-25)
//! - `clear_board` - Reset the board to empty
//! - `komi <value>` - Set komi (only before the first move)
//! - `play <color> <vertex>` - Play a move
//! - `genmove <color>` - Generate and play a move
//!
//! Turns strictly alternate, so `play` and `genmove` are refused when their
//! color is not the side to move.
//! - `undo` - Take back the last move
//! - `showboard` - Print the board
//! - `final_score` - Score the current position
//!
//! Vertices use column letters A-Z without I and row numbers counted from
//! the bottom edge, e.g. `D4`.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::board::{Color, Point};
use crate::config::Config;
use crate::error::SessionError;
use crate::scoring;
use crate::session::{EventKind, GameSession};

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "final_score",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    config: Config,
    session: GameSession,
}

impl Default for GtpEngine {
    fn default() -> Self {
        Self::with_session(GameSession::default())
    }
}

impl GtpEngine {
    pub fn new(config: Config) -> Result<Self, crate::error::ConfigError> {
        Ok(Self::with_session(GameSession::new(config)?))
    }

    fn with_session(session: GameSession) -> Self {
        Self {
            config: session.config().clone(),
            session,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Run the GTP command loop over the given streams until `quit` or EOF.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
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

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Run on stdin/stdout.
    pub fn run_stdio(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(size) = arg.parse::<usize>() else {
                    return (false, "invalid size".to_string());
                };
                self.reconfigure(Config {
                    board_size: size,
                    ..self.config.clone()
                })
                .map_or_else(|_| (false, "unacceptable size".to_string()), |()| (true, String::new()))
            }

            "clear_board" => {
                self.session.restart();
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(komi) = arg.parse::<f32>() else {
                    return (false, "invalid komi".to_string());
                };
                if self.session.history_len() > 0 {
                    return (false, "komi can only change before the first move".to_string());
                }
                match self.reconfigure(Config {
                    komi,
                    ..self.config.clone()
                }) {
                    Ok(()) => (true, String::new()),
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                if let Err(msg) = self.check_turn(args[0]) {
                    return (false, msg);
                }
                let vertex = args[1];
                let result = if vertex.eq_ignore_ascii_case("pass") {
                    self.session.pass()
                } else {
                    match parse_vertex(vertex, self.size()) {
                        Some(pt) => self.session.play(pt.x, pt.y),
                        None => return (false, "invalid vertex".to_string()),
                    }
                };
                match result {
                    Ok(_) => (true, String::new()),
                    Err(SessionError::IllegalMove(_)) => (false, "illegal move".to_string()),
                    Err(err) => (false, err.to_string()),
                }
            }

            "genmove" => {
                let Some(color) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                if let Err(msg) = self.check_turn(color) {
                    return (false, msg);
                }
                if self.session.is_finished() {
                    return (true, "pass".to_string());
                }

                // If the opponent passed and we're past the opening, pass too
                let snapshot = self.session.snapshot();
                if snapshot.consecutive_passes == 1 && snapshot.move_count > 2 {
                    return match self.session.pass() {
                        Ok(_) => (true, "pass".to_string()),
                        Err(err) => (false, err.to_string()),
                    };
                }

                let event = self
                    .session
                    .request_evaluation()
                    .and_then(|()| self.session.wait_evaluation());
                match event.map(|e| e.kind) {
                    Ok(EventKind::Played(mv)) => (true, format_vertex(mv.point, self.size())),
                    Ok(_) => (true, "pass".to_string()),
                    Err(err) => {
                        warn!(%err, "genmove failed");
                        (false, err.to_string())
                    }
                }
            }

            "undo" => match self.session.undo() {
                Ok(_) => (true, String::new()),
                Err(_) => (false, "cannot undo".to_string()),
            },

            "showboard" => (true, format!("\n{}", self.session.grid())),

            "final_score" => {
                let score = match self.session.result() {
                    Some(result) => result.score.clone(),
                    None => {
                        let snapshot = self.session.snapshot();
                        scoring::score(&snapshot.grid, snapshot.prisoners, self.config.komi).score
                    }
                };
                (true, score.to_string())
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn check_turn(&self, arg: &str) -> Result<(), String> {
        let color = parse_color(arg).ok_or_else(|| "invalid color".to_string())?;
        if !self.session.is_finished() && color != self.session.to_move() {
            return Err("wrong color to move".to_string());
        }
        Ok(())
    }

    fn size(&self) -> usize {
        self.config.board_size
    }

    fn reconfigure(&mut self, config: Config) -> Result<(), crate::error::ConfigError> {
        self.session = GameSession::new(config.clone())?;
        self.config = config;
        Ok(())
    }
}

/// Parse a GTP color: `b`, `black`, `w` or `white`, in any case.
pub fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "b" | "black" => Some(Color::Black),
        "w" | "white" => Some(Color::White),
        _ => None,
    }
}

/// Parse a GTP vertex such as `D4` on a board of `size`.
pub fn parse_vertex(s: &str, size: usize) -> Option<Point> {
    let col_char = s.as_bytes().first()?.to_ascii_uppercase();
    // Skip 'I' column (Go convention to avoid confusion with 'J')
    if !col_char.is_ascii_uppercase() || col_char == b'I' {
        return None;
    }
    let mut col = (col_char - b'A') as usize;
    if col_char > b'I' {
        col -= 1;
    }
    let row: usize = s[1..].parse().ok()?;
    if col >= size || row == 0 || row > size {
        return None;
    }
    Some(Point::new(col, size - row))
}

/// Format a point as a GTP vertex on a board of `size`.
pub fn format_vertex(pt: Point, size: usize) -> String {
    let mut c = b'A' + pt.x as u8;
    if c >= b'I' {
        c += 1;
    }
    format!("{}{}", c as char, size - pt.y)
}
