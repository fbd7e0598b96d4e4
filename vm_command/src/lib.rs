use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while1},
    combinator::value,
    multi::separated_list0,
    IResult,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandType {
    Push,
    Pop,
    Label,
    Goto,
    IfGoto,
    Function,
    Call,
    Return,
    Arithmetic,
}

impl CommandType {
    /// Classifies a normalized command line by keyword prefix.
    ///
    /// Keywords are tried in a fixed order and only need to prefix the line,
    /// so `gotoEND` is a `Goto`. Anything else is `Arithmetic`.
    pub fn classify(text: &str) -> CommandType {
        keyword(text)
            .map(|(_, command_type)| command_type)
            .unwrap_or(CommandType::Arithmetic)
    }

    pub fn keyword(self) -> Option<&'static str> {
        match self {
            CommandType::Push => Some("push"),
            CommandType::Pop => Some("pop"),
            CommandType::Label => Some("label"),
            CommandType::Goto => Some("goto"),
            CommandType::IfGoto => Some("if-goto"),
            CommandType::Function => Some("function"),
            CommandType::Call => Some("call"),
            CommandType::Return => Some("return"),
            CommandType::Arithmetic => None,
        }
    }

    pub fn has_arg1(self) -> bool {
        self != CommandType::Return
    }

    pub fn has_arg2(self) -> bool {
        matches!(
            self,
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call
        )
    }
}

impl std::fmt::Display for CommandType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.keyword() {
            Some(keyword) => write!(f, "{}", keyword),
            None => write!(f, "arithmetic"),
        }
    }
}

fn keyword(input: &str) -> IResult<&str, CommandType> {
    alt((
        value(CommandType::Push, tag("push")),
        value(CommandType::Pop, tag("pop")),
        value(CommandType::Label, tag("label")),
        value(CommandType::Goto, tag("goto")),
        value(CommandType::IfGoto, tag("if-goto")),
        value(CommandType::Function, tag("function")),
        value(CommandType::Call, tag("call")),
        value(CommandType::Return, tag("return")),
    ))(input)
}

fn tokens(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list0(
        take_while1(char::is_whitespace),
        take_till1(char::is_whitespace),
    )(input)
}

/// One decomposed VM command.
///
/// Only built through [`Command::parse`], so `arg1` is present for every type
/// but `Return` and `arg2` only for push, pop, function and call. The line it
/// was parsed from is kept verbatim alongside the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    #[serde(skip)]
    text: String,
    #[serde(rename = "type")]
    command_type: CommandType,
    #[serde(skip_serializing_if = "Option::is_none")]
    arg1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arg2: Option<i32>,
}

impl Command {
    /// Parses a line that has already had its comment stripped and been trimmed.
    pub fn parse(text: &str) -> Result<Command, ArgumentError> {
        let command_type = CommandType::classify(text);
        let (arg1, arg2) = extract_arguments(text, command_type)?;
        Ok(Command {
            text: text.to_string(),
            command_type,
            arg1,
            arg2,
        })
    }

    /// The normalized line this command came from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn arg1(&self) -> Option<&str> {
        self.arg1.as_deref()
    }

    pub fn arg2(&self) -> Option<i32> {
        self.arg2
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.command_type.keyword() {
            Some(keyword) => write!(f, "{}", keyword)?,
            None => return write!(f, "{}", self.arg1.as_deref().unwrap_or_default()),
        }
        if let Some(arg1) = &self.arg1 {
            write!(f, " {}", arg1)?;
        }
        if let Some(arg2) = self.arg2 {
            write!(f, " {}", arg2)?;
        }
        Ok(())
    }
}

/// Splits a normalized line into the arguments its command type carries.
pub fn extract_arguments(
    text: &str,
    command_type: CommandType,
) -> Result<(Option<String>, Option<i32>), ArgumentError> {
    if command_type == CommandType::Arithmetic {
        return Ok((Some(text.to_string()), None));
    }

    let words = tokens(text).map(|(_, words)| words).unwrap_or_default();

    let arg1 = if command_type.has_arg1() {
        let word = words.get(1).ok_or(ArgumentError::Missing { position: 1 })?;
        Some(word.to_string())
    } else {
        None
    };

    let arg2 = if command_type.has_arg2() {
        let word = words.get(2).ok_or(ArgumentError::Missing { position: 2 })?;
        let number = word
            .parse::<i32>()
            .map_err(|source| ArgumentError::NotAnInteger {
                token: word.to_string(),
                source,
            })?;
        Some(number)
    } else {
        None
    };

    Ok((arg1, arg2))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    Missing {
        position: u8,
    },
    NotAnInteger {
        token: String,
        source: std::num::ParseIntError,
    },
    NotApplicable {
        command_type: CommandType,
        position: u8,
    },
}

impl std::error::Error for ArgumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArgumentError::NotAnInteger { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ArgumentError::Missing { position } => write!(f, "missing argument {}", position),
            ArgumentError::NotAnInteger { token, .. } => {
                write!(f, "expected an integer, found {:?}", token)
            }
            ArgumentError::NotApplicable {
                command_type,
                position,
            } => write!(f, "{} commands have no argument {}", command_type, position),
        }
    }
}
