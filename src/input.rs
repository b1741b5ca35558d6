/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::str::FromStr;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{CallDirection, CarId};

/***************************************/
/*       Public data structures        */
/***************************************/
/// One line of button/sensor input read by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Call { floor: i32, direction: CallDirection },
    Cab { car_id: CarId, floor: i32 },
    Offline(CarId),
    Online(CarId),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty line")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("expected {0}")]
    MissingArgument(&'static str),
    #[error("`{0}` is not a valid {1}")]
    InvalidArgument(String, &'static str),
}

impl FromStr for InputCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(InputError::Empty)?;

        let parsed = match command.to_ascii_lowercase().as_str() {
            "call" => InputCommand::Call {
                floor: parse_next(&mut words, "floor")?,
                direction: parse_direction(words.next())?,
            },
            "cab" => InputCommand::Cab {
                car_id: parse_next(&mut words, "car id")?,
                floor: parse_next(&mut words, "floor")?,
            },
            "offline" => InputCommand::Offline(parse_next(&mut words, "car id")?),
            "online" => InputCommand::Online(parse_next(&mut words, "car id")?),
            "quit" | "exit" => InputCommand::Quit,
            other => return Err(InputError::UnknownCommand(other.to_string())),
        };
        Ok(parsed)
    }
}

fn parse_next<'a, T, I>(words: &mut I, what: &'static str) -> Result<T, InputError>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let word = words.next().ok_or(InputError::MissingArgument(what))?;
    word.parse()
        .map_err(|_| InputError::InvalidArgument(word.to_string(), what))
}

fn parse_direction(word: Option<&str>) -> Result<CallDirection, InputError> {
    match word.map(|w| w.to_ascii_lowercase()).as_deref() {
        Some("up") | Some("u") => Ok(CallDirection::Up),
        Some("down") | Some("d") => Ok(CallDirection::Down),
        Some(other) => Err(InputError::InvalidArgument(other.to_string(), "direction")),
        None => Err(InputError::MissingArgument("direction")),
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
