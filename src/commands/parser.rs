use crate::bot::movement::Control;

/// Leading token that marks a chat line as a bot command
pub const TRIGGER_PREFIX: &str = "bt";

/// Direction argument of `move`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
    Stop,
}

impl MoveDirection {
    /// Control to switch on, `None` for stop
    pub fn control(self) -> Option<Control> {
        match self {
            MoveDirection::Forward => Some(Control::Forward),
            MoveDirection::Back => Some(Control::Back),
            MoveDirection::Left => Some(Control::Left),
            MoveDirection::Right => Some(Control::Right),
            MoveDirection::Sprint => Some(Control::Sprint),
            MoveDirection::Stop => None,
        }
    }
}

impl std::str::FromStr for MoveDirection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(MoveDirection::Forward),
            "back" => Ok(MoveDirection::Back),
            "left" => Ok(MoveDirection::Left),
            "right" => Ok(MoveDirection::Right),
            "sprint" => Ok(MoveDirection::Sprint),
            "stop" => Ok(MoveDirection::Stop),
            other => Err(ParseError::InvalidDirection(other.to_string())),
        }
    }
}

/// A recognized chat command with its parsed arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Loaded,
    Find { block: String },
    Come,
    GoTo { x: f64, y: f64, z: f64 },
    Move(MoveDirection),
    Jump,
    ListItems,
    /// Not implemented yet; arguments are kept for when it is
    Dig { args: Vec<String> },
    Attack,
    Fish,
    StopFish,
    Farm,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Loaded => "loaded",
            Command::Find { .. } => "find",
            Command::Come => "come",
            Command::GoTo { .. } => "go-to",
            Command::Move(_) => "move",
            Command::Jump => "jump",
            Command::ListItems => "list-items",
            Command::Dig { .. } => "dig",
            Command::Attack => "attack",
            Command::Fish => "fish",
            Command::StopFish => "stop-fish",
            Command::Farm => "farm",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("missing command name")]
    MissingCommand,

    #[error("unknown command {0}")]
    UnknownCommand(String),

    #[error("{command} needs {expected}")]
    MissingArgument { command: &'static str, expected: &'static str },

    #[error("{0} is not a coordinate")]
    InvalidCoordinate(String),

    #[error("{0} is not a direction (forward, back, left, right, sprint, stop)")]
    InvalidDirection(String),
}

impl ParseError {
    /// Unknown names are dropped quietly; everything else deserves a reply
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ParseError::UnknownCommand(_) | ParseError::MissingCommand)
    }
}

fn coordinate(token: &str) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidCoordinate(token.to_string()))
}

/// Parse a chat line.
///
/// Returns `None` when the line is not addressed to the bot.
pub fn parse(text: &str) -> Option<Result<Command, ParseError>> {
    let mut words = text.split_whitespace();
    if words.next() != Some(TRIGGER_PREFIX) {
        return None;
    }

    let Some(name) = words.next() else {
        return Some(Err(ParseError::MissingCommand));
    };
    let args: Vec<&str> = words.collect();

    Some(parse_command(name, &args))
}

fn parse_command(name: &str, args: &[&str]) -> Result<Command, ParseError> {
    let command = match name {
        "loaded" => Command::Loaded,
        "find" => {
            let block = args.first().ok_or(ParseError::MissingArgument {
                command: "find",
                expected: "a block name",
            })?;
            Command::Find { block: block.to_string() }
        }
        "come" => Command::Come,
        "go-to" | "goto" => {
            let [x, y, z] = args.get(..3).and_then(|a| <[&str; 3]>::try_from(a).ok()).ok_or(
                ParseError::MissingArgument {
                    command: "go-to",
                    expected: "x y z",
                },
            )?;
            Command::GoTo {
                x: coordinate(x)?,
                y: coordinate(y)?,
                z: coordinate(z)?,
            }
        }
        "move" => {
            let direction = args.first().ok_or(ParseError::MissingArgument {
                command: "move",
                expected: "a direction",
            })?;
            Command::Move(direction.parse()?)
        }
        "jump" => Command::Jump,
        "list-items" => Command::ListItems,
        "dig" => Command::Dig {
            args: args.iter().map(|s| s.to_string()).collect(),
        },
        "attack" => Command::Attack,
        "fish" => Command::Fish,
        "stop-fish" => Command::StopFish,
        "farm" => Command::Farm,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_addressed_to_bot() {
        assert_eq!(parse("hello there"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("btfind stone"), None);
        assert_eq!(parse("please bt come"), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("bt come"), Some(Ok(Command::Come)));
        assert_eq!(parse("bt loaded"), Some(Ok(Command::Loaded)));
        assert_eq!(parse("bt  jump  "), Some(Ok(Command::Jump)));
        assert_eq!(parse("bt list-items"), Some(Ok(Command::ListItems)));
        assert_eq!(parse("bt stop-fish"), Some(Ok(Command::StopFish)));
    }

    #[test]
    fn test_find() {
        assert_eq!(
            parse("bt find diamond_ore"),
            Some(Ok(Command::Find { block: "diamond_ore".into() }))
        );
        assert!(matches!(
            parse("bt find"),
            Some(Err(ParseError::MissingArgument { command: "find", .. }))
        ));
    }

    #[test]
    fn test_goto() {
        let expected = Command::GoTo { x: 10.0, y: 5.0, z: 10.0 };
        assert_eq!(parse("bt go-to 10 5 10"), Some(Ok(expected.clone())));
        assert_eq!(parse("bt goto 10 5 10"), Some(Ok(expected)));

        assert_eq!(
            parse("bt go-to 10 up 10"),
            Some(Err(ParseError::InvalidCoordinate("up".into())))
        );
        assert!(matches!(
            parse("bt go-to 10 5"),
            Some(Err(ParseError::MissingArgument { .. }))
        ));
        assert!(matches!(parse("bt go-to NaN 1 1"), Some(Err(ParseError::InvalidCoordinate(_)))));
    }

    #[test]
    fn test_move() {
        assert_eq!(parse("bt move stop"), Some(Ok(Command::Move(MoveDirection::Stop))));
        assert_eq!(
            parse("bt move sprint"),
            Some(Ok(Command::Move(MoveDirection::Sprint)))
        );
        assert_eq!(
            parse("bt move up"),
            Some(Err(ParseError::InvalidDirection("up".into())))
        );
        assert_eq!(MoveDirection::Left.control(), Some(Control::Left));
        assert_eq!(MoveDirection::Stop.control(), None);
    }

    #[test]
    fn test_unknown_and_missing() {
        let err = parse("bt dance").unwrap().unwrap_err();
        assert_eq!(err, ParseError::UnknownCommand("dance".into()));
        assert!(!err.is_user_facing());
        assert_eq!(parse("bt"), Some(Err(ParseError::MissingCommand)));
        assert!(ParseError::InvalidCoordinate("x".into()).is_user_facing());
    }

    #[test]
    fn test_dig_keeps_arguments() {
        assert_eq!(
            parse("bt dig 1 2 3"),
            Some(Ok(Command::Dig { args: vec!["1".into(), "2".into(), "3".into()] }))
        );
        assert_eq!(Command::Dig { args: vec![] }.name(), "dig");
    }
}
