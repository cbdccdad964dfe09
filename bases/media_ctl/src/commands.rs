// bases/media_ctl/src/commands.rs
use clap::Subcommand;
use color_eyre::eyre::{eyre, Report};
use std::str::FromStr;
use time_primitives::Millis;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List downloaded songs
    List,

    /// Delete a downloaded song and its audio file
    Delete {
        /// Song id as shown by `list`
        id: String,
    },

    /// Play the library interactively, starting with a song
    Play {
        /// Song id to start with (defaults to the first song)
        id: Option<String>,
    },
}

/// A line typed at the interactive player prompt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Pause,
    Resume,
    Next,
    Previous,
    Seek(Millis),
    Status,
    Help,
    Quit,
}

impl FromStr for PlayerCommand {
    type Err = Report;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let argument = words.next();

        if words.next().is_some() {
            return Err(eyre!("Too many arguments: {}", line.trim()));
        }

        let parsed = match (command.as_str(), argument) {
            ("pause", None) => Self::Pause,
            ("resume" | "play", None) => Self::Resume,
            ("next" | "n", None) => Self::Next,
            ("prev" | "previous" | "p", None) => Self::Previous,
            ("seek", Some(seconds)) => Self::Seek(parse_seconds(seconds)?),
            ("seek", None) => return Err(eyre!("Usage: seek <seconds>")),
            ("status" | "s", None) => Self::Status,
            ("help" | "?", None) => Self::Help,
            ("quit" | "q" | "exit", None) => Self::Quit,
            ("", _) => return Err(eyre!("Empty command")),
            (other, _) => return Err(eyre!("Unknown command '{}', try 'help'", other)),
        };
        Ok(parsed)
    }
}

fn parse_seconds(text: &str) -> color_eyre::Result<Millis> {
    let seconds: f64 = text
        .parse()
        .map_err(|_| eyre!("Invalid position '{}', expected seconds", text))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(eyre!("Position must be a positive number of seconds"));
    }
    Ok(Millis::new((seconds * 1_000.0).round() as u64))
}

pub const PLAYER_HELP: &str =
    "Commands: pause, resume, next, prev, seek <seconds>, status, help, quit";

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pause", PlayerCommand::Pause)]
    #[case("resume", PlayerCommand::Resume)]
    #[case("NEXT", PlayerCommand::Next)]
    #[case("prev", PlayerCommand::Previous)]
    #[case("  status  ", PlayerCommand::Status)]
    #[case("q", PlayerCommand::Quit)]
    #[case("seek 42", PlayerCommand::Seek(Millis::from_secs(42)))]
    #[case("seek 1.5", PlayerCommand::Seek(Millis::new(1_500)))]
    fn parses_player_commands(#[case] line: &str, #[case] expected: PlayerCommand) {
        assert_eq!(line.parse::<PlayerCommand>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("seek")]
    #[case("seek -3")]
    #[case("seek soon")]
    #[case("pause now")]
    #[case("rewind")]
    fn rejects_bad_lines(#[case] line: &str) {
        assert!(line.parse::<PlayerCommand>().is_err());
    }
}
