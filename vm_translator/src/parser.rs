use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use vm_command::{ArgumentError, Command, CommandType};

use crate::error::{Result, TranslateError};
use crate::line_source::LineSource;

/// Sequential cursor over the commands of one `.vm` source.
pub struct Parser<R: BufRead> {
    source: LineSource<R>,
    current: Option<Current>,
}

struct Current {
    line: usize,
    command: Command,
}

impl Parser<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Parser::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Parser<R> {
    pub fn new(reader: R) -> Self {
        Parser {
            source: LineSource::new(reader),
            current: None,
        }
    }

    pub fn has_more_lines(&mut self) -> bool {
        self.source.has_more_lines()
    }

    /// Reads the next command and makes it the current one.
    ///
    /// Returns `Ok(None)` when only blank or comment lines were left. A line
    /// that fails to parse is consumed and leaves no current command.
    pub fn advance(&mut self) -> Result<Option<&Command>> {
        self.current = None;

        let (line, text) = match self.source.advance()? {
            Some(next) => next,
            None => return Ok(None),
        };

        let command = Command::parse(&text).map_err(|error| TranslateError::Malformed {
            line,
            text: text.clone(),
            error,
        })?;
        debug!("line {}: {:?}", line, command);

        let current = self.current.get_or_insert(Current { line, command });
        Ok(Some(&current.command))
    }

    pub fn current(&self) -> Result<&Command> {
        self.current
            .as_ref()
            .map(|current| &current.command)
            .ok_or(TranslateError::NoCurrentCommand)
    }

    pub fn line_number(&self) -> Option<usize> {
        self.current.as_ref().map(|current| current.line)
    }

    pub fn command_type(&self) -> Result<CommandType> {
        Ok(self.current()?.command_type())
    }

    /// First argument; the operator itself for arithmetic commands.
    pub fn arg1(&self) -> Result<&str> {
        let current = self.current.as_ref().ok_or(TranslateError::NoCurrentCommand)?;
        current
            .command
            .arg1()
            .ok_or_else(|| current.not_applicable(1))
    }

    /// Second argument; only push, pop, function and call carry one.
    pub fn arg2(&self) -> Result<i32> {
        let current = self.current.as_ref().ok_or(TranslateError::NoCurrentCommand)?;
        current
            .command
            .arg2()
            .ok_or_else(|| current.not_applicable(2))
    }
}

impl Current {
    fn not_applicable(&self, position: u8) -> TranslateError {
        TranslateError::Malformed {
            line: self.line,
            text: self.command.text().to_string(),
            error: ArgumentError::NotApplicable {
                command_type: self.command.command_type(),
                position,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(input: &'static str) -> Parser<&'static [u8]> {
        Parser::new(input.as_bytes())
    }

    #[test]
    fn push_exposes_both_arguments() {
        let mut p = parser("push local 2\n");
        assert!(p.has_more_lines());
        p.advance().unwrap();
        assert_eq!(p.command_type().unwrap(), CommandType::Push);
        assert_eq!(p.arg1().unwrap(), "local");
        assert_eq!(p.arg2().unwrap(), 2);
        assert_eq!(p.line_number(), Some(1));
    }

    #[test]
    fn inline_comment_is_stripped_before_tokenizing() {
        let mut p = parser("push constant 7 // comment\n");
        p.advance().unwrap();
        assert_eq!(p.arg2().unwrap(), 7);
    }

    #[test]
    fn label_has_no_second_argument() {
        let mut p = parser("label LOOP");
        p.advance().unwrap();
        assert_eq!(p.command_type().unwrap(), CommandType::Label);
        assert_eq!(p.arg1().unwrap(), "LOOP");
        let error = p.arg2().unwrap_err();
        assert!(matches!(
            error,
            TranslateError::Malformed {
                line: 1,
                error: ArgumentError::NotApplicable { position: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn return_has_no_first_argument() {
        let mut p = parser("return");
        p.advance().unwrap();
        assert_eq!(p.command_type().unwrap(), CommandType::Return);
        assert!(p.arg1().unwrap_err().is_malformed());
    }

    #[test]
    fn arithmetic_first_argument_is_the_operator() {
        let mut p = parser("  eq  ");
        p.advance().unwrap();
        assert_eq!(p.command_type().unwrap(), CommandType::Arithmetic);
        assert_eq!(p.arg1().unwrap(), "eq");
    }

    #[test]
    fn accessors_before_advance_fail() {
        let p = parser("add");
        assert!(matches!(p.command_type(), Err(TranslateError::NoCurrentCommand)));
        assert!(matches!(p.arg1(), Err(TranslateError::NoCurrentCommand)));
        assert!(matches!(p.arg2(), Err(TranslateError::NoCurrentCommand)));
        assert_eq!(p.line_number(), None);
    }

    #[test]
    fn accessors_are_idempotent() {
        let mut p = parser("call Math.multiply 2\n");
        p.advance().unwrap();
        for _ in 0..3 {
            assert_eq!(p.command_type().unwrap(), CommandType::Call);
            assert_eq!(p.arg1().unwrap(), "Math.multiply");
            assert_eq!(p.arg2().unwrap(), 2);
        }
    }

    #[test]
    fn malformed_line_reports_text_and_number() {
        let mut p = parser("// header\npush constant x\nadd\n");
        let error = p.advance().unwrap_err();
        match error {
            TranslateError::Malformed { line, text, error } => {
                assert_eq!(line, 2);
                assert_eq!(text, "push constant x");
                assert!(matches!(error, ArgumentError::NotAnInteger { .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(p.current(), Err(TranslateError::NoCurrentCommand)));

        assert_eq!(p.advance().unwrap().map(|c| c.to_string()), Some("add".to_string()));
    }

    #[test]
    fn advance_count_matches_logical_lines() {
        let mut p = parser("\n// a\nfunction Main.main 0\n\n  \npush constant 1\nreturn // done\n\n");
        let mut count = 0;
        while p.has_more_lines() {
            if p.advance().unwrap().is_some() {
                count += 1;
            }
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn trailing_blank_lines_end_without_a_command() {
        let mut p = parser("add\n\n// bye\n");
        assert!(p.advance().unwrap().is_some());
        assert!(p.has_more_lines());
        assert!(p.advance().unwrap().is_none());
        assert!(p.current().is_err());
        assert!(!p.has_more_lines());
        assert!(!p.has_more_lines());
    }
}
