use crate::board::{Board, FenError};
use crate::game::Game;
use crate::history::move_list_text;
use crate::piece::Color;
use crate::r#move::Move;
use crate::search::{BotTier, SearchReport};
use crate::square::Square;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Interactive front end: reads commands, drives a [`Game`], and answers for the
/// automated opponent when playing against it.
pub struct Cli {
    game: Game,
    options: BTreeMap<String, CliOption>,
    human: Color,
    rng: StdRng,
}
impl Default for Cli {
    fn default() -> Self {
        Cli::with_rng(StdRng::from_entropy())
    }
}

impl Cli {
    pub fn with_rng(rng: StdRng) -> Self {
        let mut cli = Cli {
            game: Game::new(),
            options: BTreeMap::from([
                (
                    "Mode".to_string(),
                    CliOption::choice("Mode", "bot", &["local", "bot"]),
                ),
                (
                    "PlayerSide".to_string(),
                    CliOption::choice("PlayerSide", "white", &["white", "black", "random"]),
                ),
                (
                    "Difficulty".to_string(),
                    CliOption::choice("Difficulty", "medium", &["easy", "medium", "hard"]),
                ),
                (
                    "Debug".to_string(),
                    CliOption::BoolValue {
                        name: "Debug".to_string(),
                        value: false,
                        default: false,
                    },
                ),
            ]),
            human: Color::White,
            rng,
        };
        cli.pick_human_side();
        cli
    }

    pub fn run(&mut self) {
        let mut editor = Editor::<()>::new();
        editor.set_auto_add_history(true);
        editor.set_check_cursor_position(true);

        println!("{}", self.game.board());
        self.bot_turn();
        while let Ok(line) = editor.readline("gambit> ") {
            match self.handle_command(&line) {
                Ok(CliOkCode::ShouldQuit) => break,
                Ok(CliOkCode::OkCommand) | Err(CommandError::NoCommand) => (),
                Err(CommandError::MissingArg(arg)) => {
                    eprintln!("Missing an argument: {} {} <- here", line.trim(), arg)
                }
                Err(err) => eprintln!("{}", err),
            }
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The side played from the keyboard when playing against the bot
    pub fn human_side(&self) -> Color {
        self.human
    }

    pub fn handle_command(&mut self, line: &str) -> Result<CliOkCode, CommandError> {
        let args_regex = Self::args_regex();
        let mut args = args_regex.find_iter(line).map(|m| m.as_str());
        let cmd = args.next().ok_or(CommandError::NoCommand)?;
        match cmd {
            "new" => {
                self.game.reset();
                self.pick_human_side();
                println!("{}", self.game.board());
                self.bot_turn();
            }
            "position" => {
                let board = match args.next() {
                    Some("startpos") => Board::new(),
                    Some("fen") => {
                        let fen = args
                            .by_ref()
                            .take_while(|a| *a != "moves")
                            .collect::<Vec<_>>()
                            .join(" ");
                        if fen.is_empty() {
                            return Err(CommandError::MissingArg(String::from("<fen>")));
                        }
                        Board::from_fen(&fen.replace('"', ""))?
                    }
                    Some(other) => return Err(CommandError::BadArg(String::from(other))),
                    None => return Err(CommandError::MissingArg(String::from("<startpos | fen>"))),
                };
                self.game = Game::from_board(board);
                for mv in args.filter(|a| *a != "moves") {
                    self.play(mv)?;
                }
            }
            "moves" => {
                let square_str = args
                    .next()
                    .ok_or_else(|| CommandError::MissingArg(String::from("<square>")))?;
                let origin =
                    Square::parse(square_str).ok_or_else(|| CommandError::BadSquare(square_str.to_string()))?;
                let targets = self
                    .game
                    .legal_moves(origin)
                    .iter()
                    .map(|m| m.target.to_string())
                    .collect::<Vec<_>>();
                println!("{}: {}", origin, targets.join(" "));
            }
            "move" => {
                let mv = args
                    .next()
                    .ok_or_else(|| CommandError::MissingArg(String::from("<move>")))?;
                if self.against_bot() && self.game.side_to_move() != self.human {
                    return Err(CommandError::NotYourTurn);
                }
                let notation = self.play(mv)?;
                println!("{}", notation);
                self.report_outcome();
                self.bot_turn();
            }
            "undo" => {
                if self.game.history().is_empty() {
                    return Err(CommandError::NothingToUndo);
                }
                let undone = if self.against_bot() {
                    self.game.undo_ply_pair(self.human)
                } else {
                    self.game.undo_last();
                    1
                };
                println!("undone {}", undone);
                self.bot_turn();
            }
            "hint" => match self.game.hint(&mut self.rng) {
                Some(m) => println!("hint {}", m),
                None => println!("hint none"),
            },
            "go" | "bot" => {
                if self.game.is_game_over() {
                    return Err(CommandError::GameOver);
                }
                let tier = self.difficulty();
                let (record, report) = self.game.play_bot_move(tier, &mut self.rng);
                self.send_report(&report);
                println!("{}", record);
                self.report_outcome();
            }
            "show" => println!("{}", self.game.board()),
            "history" => println!("{}", move_list_text(self.game.history())),
            "set" => {
                let name = args
                    .next()
                    .ok_or_else(|| CommandError::MissingArg(String::from("<name>")))?;
                let value = args
                    .next()
                    .ok_or_else(|| CommandError::MissingArg(String::from("<value>")))?;
                self.set_option(name, value)?;
                if name == "PlayerSide" {
                    self.pick_human_side();
                }
                self.bot_turn();
            }
            "debug" => {
                let value = if args.next().unwrap_or("off") == "on" { "true" } else { "false" };
                self.set_option("Debug", value)?;
            }
            "options" => self.options.values().for_each(|o| println!("option {}", o)),
            "timeout" => {
                let color_str = args
                    .next()
                    .ok_or_else(|| CommandError::MissingArg(String::from("<white | black>")))?;
                let color = Color::parse(color_str).ok_or_else(|| CommandError::BadArg(color_str.to_string()))?;
                self.game.notify_timeout(color);
                self.report_outcome();
            }
            "quit" => return Ok(CliOkCode::ShouldQuit),
            _ => return Err(CommandError::BadCommand(String::from(cmd))),
        }

        Ok(CliOkCode::OkCommand)
    }

    /// Plays a move given as "e2e4" for whoever is to move
    fn play(&mut self, mv: &str) -> Result<String, CommandError> {
        if self.game.is_game_over() {
            return Err(CommandError::GameOver);
        }
        let (origin, target) = Move::parse(mv).ok_or_else(|| CommandError::BadMove(mv.to_string()))?;
        if self.game.legal_moves(origin).find(origin, target).is_none() {
            return Err(CommandError::BadMove(mv.to_string()));
        }
        Ok(self.game.apply_move(origin, target).to_string())
    }

    /// Lets the bot move if it is its turn
    fn bot_turn(&mut self) {
        if !self.against_bot() || self.game.is_game_over() || self.game.side_to_move() == self.human {
            return;
        }
        let tier = self.difficulty();
        let (record, report) = self.game.play_bot_move(tier, &mut self.rng);
        self.send_report(&report);
        println!("bot {}", record);
        self.report_outcome();
    }

    fn send_report(&self, report: &SearchReport) {
        if self.debug_mode() {
            println!("info {}", report);
        }
        println!("bestmove {}", report.best_move);
    }

    fn report_outcome(&self) {
        if let Some(reason) = self.game.terminal_reason() {
            println!("result {}", reason);
        }
    }

    fn pick_human_side(&mut self) {
        self.human = match self.option_value("PlayerSide").as_deref() {
            Some("black") => Color::Black,
            Some("random") => {
                if self.rng.gen_bool(0.5) {
                    Color::White
                } else {
                    Color::Black
                }
            }
            _ => Color::White,
        };
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), CommandError> {
        self.options
            .get_mut(name)
            .ok_or_else(|| CommandError::BadOption(name.to_string()))?
            .set_value(value)
    }

    fn option_value(&self, name: &str) -> Option<String> {
        self.options.get(name).map(|o| o.value())
    }

    fn against_bot(&self) -> bool {
        self.option_value("Mode").as_deref() == Some("bot")
    }

    fn debug_mode(&self) -> bool {
        self.option_value("Debug").as_deref() == Some("true")
    }

    fn difficulty(&self) -> BotTier {
        self.option_value("Difficulty")
            .and_then(|d| d.parse().ok())
            .unwrap_or(BotTier::Heuristic)
    }

    fn args_regex() -> Regex {
        Regex::new(r#"(".*?"|[^"\s]+)"#).expect("argument pattern is valid")
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum CliOkCode {
    OkCommand,
    ShouldQuit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("no command")]
    NoCommand,
    #[error("Unknown or badly formed command: {0}")]
    BadCommand(String),
    #[error("Unexpected argument: {0}")]
    BadArg(String),
    #[error("Missing an argument: {0}")]
    MissingArg(String),
    #[error("Badly formatted or illegal move: {0}")]
    BadMove(String),
    #[error("Not a square: {0}")]
    BadSquare(String),
    #[error("No such option: {0}")]
    BadOption(String),
    #[error("Invalid value {value} for option {name}")]
    BadValue { name: String, value: String },
    #[error("Invalid position: {0}")]
    Fen(#[from] FenError),
    #[error("The game is over, start a new one or undo")]
    GameOver,
    #[error("Waiting for the bot to move")]
    NotYourTurn,
    #[error("No move to undo")]
    NothingToUndo,
}

pub enum CliOption {
    BoolValue {
        name: String,
        value: bool,
        default: bool,
    },
    StringChoice {
        name: String,
        value: String,
        default: String,
        possible_values: Vec<String>,
    },
}
impl CliOption {
    fn choice(name: &str, default: &str, possible_values: &[&str]) -> Self {
        Self::StringChoice {
            name: name.to_string(),
            value: default.to_string(),
            default: default.to_string(),
            possible_values: possible_values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn value(&self) -> String {
        match self {
            Self::BoolValue { value, .. } => value.to_string(),
            Self::StringChoice { value, .. } => value.clone(),
        }
    }

    pub fn set_value(&mut self, v: &str) -> Result<(), CommandError> {
        let bad_value = |name: &str| CommandError::BadValue {
            name: name.to_string(),
            value: v.to_string(),
        };
        match self {
            Self::BoolValue { name, value, .. } => *value = v.parse::<bool>().map_err(|_| bad_value(name))?,
            Self::StringChoice {
                name,
                value,
                possible_values,
                ..
            } => {
                let set_to = possible_values
                    .iter()
                    .find(|x| x.as_str() == v)
                    .ok_or_else(|| bad_value(name))?;
                *value = set_to.to_string();
            }
        }
        Ok(())
    }
}
impl Display for CliOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoolValue { name, value, default } => {
                write!(f, "name {} type check default {} value {}", name, default, value)
            }
            Self::StringChoice {
                name,
                value,
                default,
                possible_values,
            } => write!(
                f,
                "name {} type combo default {}{} value {}",
                name,
                default,
                possible_values
                    .iter()
                    .fold(String::new(), |acc, x| format!("{} var {}", acc, x)),
                value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TerminalReason;

    fn cli() -> Cli {
        Cli::with_rng(StdRng::seed_from_u64(42))
    }

    fn local() -> Cli {
        let mut cli = cli();
        cli.handle_command("set Mode local").unwrap();
        cli
    }

    #[test]
    fn blank_and_unknown_commands() {
        let mut cli = cli();
        assert_eq!(cli.handle_command("   "), Err(CommandError::NoCommand));
        assert_eq!(
            cli.handle_command("castle now"),
            Err(CommandError::BadCommand("castle".to_string()))
        );
        assert_eq!(cli.handle_command("quit"), Ok(CliOkCode::ShouldQuit));
    }

    #[test]
    fn position_with_moves() {
        let mut cli = local();
        cli.handle_command("position startpos moves e2e4 e7e5 g1f3").unwrap();
        assert_eq!(cli.game().history().len(), 3);
        assert_eq!(cli.game().side_to_move(), Color::Black);

        cli.handle_command(r#"position fen "4k3/8/8/8/8/8/8/R3K3 w Q - 0 1" moves e1c1"#)
            .unwrap();
        assert!(cli.game().history()[0].is_castling());

        cli.handle_command("position fen 4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(cli.game().side_to_move(), Color::Black);

        assert!(matches!(
            cli.handle_command("position fen 4k3/8/8 w - - 0 1"),
            Err(CommandError::Fen(_))
        ));
        assert_eq!(
            cli.handle_command("position startpos moves e2e5"),
            Err(CommandError::BadMove("e2e5".to_string()))
        );
    }

    #[test]
    fn the_bot_answers_a_human_move() {
        let mut cli = cli();
        cli.handle_command("move e2e4").unwrap();
        assert_eq!(cli.game().history().len(), 2);
        assert_eq!(cli.game().side_to_move(), Color::White);

        cli.handle_command("undo").unwrap();
        assert!(cli.game().history().is_empty());
        assert_eq!(cli.handle_command("undo"), Err(CommandError::NothingToUndo));
    }

    #[test]
    fn the_bot_opens_for_a_black_human() {
        let mut cli = cli();
        cli.handle_command("set PlayerSide black").unwrap();
        assert_eq!(cli.human_side(), Color::Black);
        assert_eq!(cli.game().history().len(), 1);
        assert_eq!(cli.game().side_to_move(), Color::Black);
    }

    #[test]
    fn no_move_out_of_turn_against_the_bot() {
        let mut cli = cli();
        cli.handle_command("position startpos moves e2e4").unwrap();
        assert_eq!(cli.handle_command("move e7e5"), Err(CommandError::NotYourTurn));
        cli.handle_command("go").unwrap();
        assert_eq!(cli.game().history().len(), 2);
    }

    #[test]
    fn local_games_alternate() {
        let mut cli = local();
        for mv in ["move f2f3", "move e7e5", "move g2g4", "move d8h4"] {
            cli.handle_command(mv).unwrap();
        }
        assert_eq!(
            cli.game().terminal_reason(),
            Some(TerminalReason::Checkmate { winner: Color::Black })
        );
        assert_eq!(cli.handle_command("move a2a3"), Err(CommandError::GameOver));
        assert_eq!(cli.handle_command("go"), Err(CommandError::GameOver));

        cli.handle_command("undo").unwrap();
        assert_eq!(cli.game().history().len(), 3);
        assert!(!cli.game().is_game_over());
    }

    #[test]
    fn timeout_ends_the_game() {
        let mut cli = local();
        cli.handle_command("timeout white").unwrap();
        assert_eq!(
            cli.game().terminal_reason(),
            Some(TerminalReason::Timeout { winner: Color::Black })
        );
        assert_eq!(cli.handle_command("timeout red"), Err(CommandError::BadArg("red".to_string())));
        cli.handle_command("new").unwrap();
        assert!(!cli.game().is_game_over());
    }

    #[test]
    fn options() {
        let mut cli = cli();
        assert_eq!(cli.difficulty(), BotTier::Heuristic);
        cli.handle_command("set Difficulty hard").unwrap();
        assert_eq!(cli.difficulty(), BotTier::Minimax);
        assert_eq!(
            cli.handle_command("set Difficulty impossible"),
            Err(CommandError::BadValue {
                name: "Difficulty".to_string(),
                value: "impossible".to_string()
            })
        );
        assert_eq!(
            cli.handle_command("set Colour red"),
            Err(CommandError::BadOption("Colour".to_string()))
        );
        assert_eq!(
            cli.handle_command("set Mode"),
            Err(CommandError::MissingArg("<value>".to_string()))
        );
        cli.handle_command("debug on").unwrap();
        assert!(cli.debug_mode());
        assert_eq!(
            cli.options["Mode"].to_string(),
            "name Mode type combo default bot var local var bot value bot"
        );
    }

    #[test]
    fn moves_and_hint_leave_the_game_alone() {
        let mut cli = local();
        cli.handle_command("moves e2").unwrap();
        cli.handle_command("hint").unwrap();
        cli.handle_command("show").unwrap();
        cli.handle_command("history").unwrap();
        assert!(cli.game().history().is_empty());
        assert_eq!(cli.handle_command("moves z9"), Err(CommandError::BadSquare("z9".to_string())));
    }
}
