//! The command grammar: the one place where raw client text becomes a
//! typed [`Command`].
//!
//! ```text
//! command   = move | "ATTACK" | "FIREBALL" | msg | "QUIT"
//! move      = "MOVE" SP direction
//! direction = "UP" | "DOWN" | "LEFT" | "RIGHT"
//! msg       = "MSG" SP text          ; text is non-empty
//! ```
//!
//! Leading and trailing whitespace around the whole frame is ignored, and
//! verbs and directions match case-insensitively. Everything else is a
//! [`ProtocolError`]. Control characters inside message text are replaced
//! with spaces so a message always renders on a single snapshot line.

use std::fmt;
use std::str::FromStr;

use crate::{Direction, ProtocolError};

/// A parsed client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Step one cell in a direction.
    Move(Direction),
    /// Radius-1 area attack.
    Attack,
    /// Radius-2 area attack.
    Fireball,
    /// Queue a chat message for the next snapshot.
    Msg(String),
    /// End the session.
    Quit,
}

impl Command {
    /// Decodes and parses one frame payload.
    ///
    /// # Errors
    /// [`ProtocolError::InvalidUtf8`] for non-UTF-8 payloads, otherwise
    /// whatever [`Command::from_str`] reports.
    pub fn from_frame(payload: &[u8]) -> Result<Self, ProtocolError> {
        let text =
            std::str::from_utf8(payload).map_err(|_| ProtocolError::InvalidUtf8)?;
        text.parse()
    }

    /// The verb keyword of this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Move(_) => "MOVE",
            Self::Attack => "ATTACK",
            Self::Fireball => "FIREBALL",
            Self::Msg(_) => "MSG",
            Self::Quit => "QUIT",
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }

        // Split off the verb at the first run of whitespace. For MSG the
        // remainder is kept verbatim (after that one separator).
        let (verb, rest) =
            line.split_once(char::is_whitespace).unwrap_or((line, ""));

        if verb.eq_ignore_ascii_case("MOVE") {
            parse_move(rest)
        } else if verb.eq_ignore_ascii_case("ATTACK") {
            no_arguments("ATTACK", rest, Self::Attack)
        } else if verb.eq_ignore_ascii_case("FIREBALL") {
            no_arguments("FIREBALL", rest, Self::Fireball)
        } else if verb.eq_ignore_ascii_case("QUIT") {
            no_arguments("QUIT", rest, Self::Quit)
        } else if verb.eq_ignore_ascii_case("MSG") {
            parse_msg(rest)
        } else {
            Err(ProtocolError::UnknownVerb(verb.to_string()))
        }
    }
}

fn parse_move(rest: &str) -> Result<Command, ProtocolError> {
    let arg = rest.trim();
    Direction::ALL
        .into_iter()
        .find(|d| arg.eq_ignore_ascii_case(d.keyword()))
        .map(Command::Move)
        .ok_or_else(|| ProtocolError::InvalidArguments {
            verb: "MOVE",
            detail: format!("expected UP, DOWN, LEFT or RIGHT, got {arg:?}"),
        })
}

fn parse_msg(rest: &str) -> Result<Command, ProtocolError> {
    if rest.trim().is_empty() {
        return Err(ProtocolError::InvalidArguments {
            verb: "MSG",
            detail: "message text is empty".into(),
        });
    }
    let text = rest
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    Ok(Command::Msg(text))
}

fn no_arguments(
    verb: &'static str,
    rest: &str,
    command: Command,
) -> Result<Command, ProtocolError> {
    if rest.trim().is_empty() {
        Ok(command)
    } else {
        Err(ProtocolError::InvalidArguments {
            verb,
            detail: format!("takes no arguments, got {:?}", rest.trim()),
        })
    }
}

/// Renders the canonical wire text, e.g. `MOVE UP` or `MSG hi`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(dir) => write!(f, "MOVE {dir}"),
            Self::Msg(text) => write!(f, "MSG {text}"),
            other => f.write_str(other.verb()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Command, ProtocolError> {
        s.parse()
    }

    #[test]
    fn test_parse_move_all_directions() {
        assert_eq!(parse("MOVE UP"), Ok(Command::Move(Direction::Up)));
        assert_eq!(parse("MOVE DOWN"), Ok(Command::Move(Direction::Down)));
        assert_eq!(parse("MOVE LEFT"), Ok(Command::Move(Direction::Left)));
        assert_eq!(parse("MOVE RIGHT"), Ok(Command::Move(Direction::Right)));
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        assert_eq!(parse("  move right\r\n"), Ok(Command::Move(Direction::Right)));
        assert_eq!(parse("attack\n"), Ok(Command::Attack));
        assert_eq!(parse("FireBall"), Ok(Command::Fireball));
        assert_eq!(parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_move_bad_direction_is_error() {
        assert!(matches!(
            parse("MOVE UPWARD"),
            Err(ProtocolError::InvalidArguments { verb: "MOVE", .. })
        ));
        assert!(matches!(
            parse("MOVE"),
            Err(ProtocolError::InvalidArguments { verb: "MOVE", .. })
        ));
    }

    #[test]
    fn test_parse_attack_with_arguments_is_error() {
        assert!(matches!(
            parse("ATTACK now"),
            Err(ProtocolError::InvalidArguments { verb: "ATTACK", .. })
        ));
    }

    #[test]
    fn test_parse_msg_keeps_text_after_one_separator() {
        assert_eq!(
            parse("MSG hello  there"),
            Ok(Command::Msg("hello  there".into()))
        );
        assert_eq!(parse("MSG  padded"), Ok(Command::Msg(" padded".into())));
    }

    #[test]
    fn test_parse_msg_empty_is_error() {
        assert!(matches!(
            parse("MSG"),
            Err(ProtocolError::InvalidArguments { verb: "MSG", .. })
        ));
        assert!(matches!(
            parse("MSG    "),
            Err(ProtocolError::InvalidArguments { verb: "MSG", .. })
        ));
    }

    #[test]
    fn test_parse_msg_replaces_control_characters() {
        assert_eq!(
            parse("MSG line1\nline2\tend"),
            Ok(Command::Msg("line1 line2 end".into()))
        );
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert_eq!(parse("DANCE"), Err(ProtocolError::UnknownVerb("DANCE".into())));
        assert_eq!(parse("   "), Err(ProtocolError::Empty));
        assert_eq!(parse("MOVEUP"), Err(ProtocolError::UnknownVerb("MOVEUP".into())));
    }

    #[test]
    fn test_from_frame_rejects_invalid_utf8() {
        assert_eq!(
            Command::from_frame(&[0xff, 0xfe]),
            Err(ProtocolError::InvalidUtf8)
        );
        assert_eq!(Command::from_frame(b"ATTACK"), Ok(Command::Attack));
    }

    #[test]
    fn test_display_is_canonical_wire_text() {
        assert_eq!(Command::Move(Direction::Left).to_string(), "MOVE LEFT");
        assert_eq!(Command::Msg("gg".into()).to_string(), "MSG gg");
        assert_eq!(Command::Fireball.to_string(), "FIREBALL");
        assert_eq!(Command::Quit.to_string(), "QUIT");
    }
}
