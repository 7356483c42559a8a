//! Interactive command console
//!
//! Text commands map one to one onto scheduler operations. A rejected
//! command prints an error and leaves the scheduler untouched.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use crate::simulation::{CarId, Direction, FleetScheduler, FleetState, Floor};

pub const HELP: &str = "\
Commands:
  tick [n]              advance the simulation n ticks (default 1)
  call <floor> <up|down> place a hall call
  press <car> <floor>   press a floor button inside a car
  status                show cars and pending calls
  save <path>           write the current state as JSON
  load <path>           replace the simulation with a saved state
  help                  show this text
  quit                  leave the console";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tick(u32),
    Call { floor: Floor, direction: Direction },
    Press { car: CarId, floor: Floor },
    Status,
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Quit,
}

fn parse_number(word: Option<&str>, what: &str) -> Result<u32> {
    let word = word.with_context(|| format!("missing {}", what))?;
    word.parse::<u32>()
        .with_context(|| format!("invalid {} '{}'", what, word))
}

fn parse_direction(word: Option<&str>) -> Result<Direction> {
    let word = word.context("missing direction")?;
    match word.to_ascii_lowercase().as_str() {
        "up" | "u" => Ok(Direction::Up),
        "down" | "d" => Ok(Direction::Down),
        _ => bail!("invalid direction '{}' (expected up or down)", word),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let keyword = words.next().context("empty command")?.to_ascii_lowercase();

        let command = match keyword.as_str() {
            "tick" => match words.next() {
                Some(count) => Command::Tick(parse_number(Some(count), "tick count")?),
                None => Command::Tick(1),
            },
            "call" => {
                let floor = parse_number(words.next(), "floor")?;
                let direction = parse_direction(words.next())?;
                Command::Call { floor, direction }
            }
            "press" => {
                let car = CarId(parse_number(words.next(), "car id")?);
                let floor = parse_number(words.next(), "floor")?;
                Command::Press { car, floor }
            }
            "status" => Command::Status,
            "save" => Command::Save(words.next().context("missing path")?.into()),
            "load" => Command::Load(words.next().context("missing path")?.into()),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument '{}'", extra);
        }
        Ok(command)
    }
}

/// What the caller should do after a command ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Write a snapshot as pretty JSON
pub fn save_state(state: &FleetState, path: &std::path::Path) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read a snapshot written by [`save_state`]
pub fn load_state(path: &std::path::Path) -> Result<FleetState> {
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Runs commands against a scheduler
pub struct Console {
    scheduler: FleetScheduler,
}

impl Console {
    pub fn new(scheduler: FleetScheduler) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &FleetScheduler {
        &self.scheduler
    }

    pub fn into_scheduler(self) -> FleetScheduler {
        self.scheduler
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome> {
        let message = match command {
            Command::Tick(n) => {
                self.scheduler.tick(n);
                self.scheduler.status().to_string()
            }
            Command::Call { floor, direction } => {
                self.scheduler.request_call(floor, direction)?;
                format!("call placed at floor {} going {}", floor, direction)
            }
            Command::Press { car, floor } => {
                self.scheduler.assign_floor(car, floor)?;
                format!("car {} will stop at floor {}", car, floor)
            }
            Command::Status => self.scheduler.status().to_string(),
            Command::Save(path) => {
                save_state(&self.scheduler.current_state(), &path)?;
                format!("saved to {}", path.display())
            }
            Command::Load(path) => {
                let state = load_state(&path)?;
                self.scheduler
                    .restore(&state)
                    .with_context(|| format!("Invalid state in {}", path.display()))?;
                format!("loaded {}", path.display())
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(message))
    }

    /// Parse and run one line. Blank lines do nothing.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome> {
        if line.trim().is_empty() {
            return Ok(Outcome::Continue(String::new()));
        }
        let command: Command = line.parse()?;
        self.execute(command)
    }

    /// Read commands until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            match self.execute_line(&line) {
                Ok(Outcome::Quit) => return Ok(()),
                Ok(Outcome::Continue(message)) => {
                    if !message.is_empty() {
                        writeln!(output, "{}", message)?;
                    }
                }
                Err(e) => writeln!(output, "error: {:#}", e)?,
            }
            write!(output, "> ")?;
            output.flush()?;
        }

        Ok(())
    }
}
