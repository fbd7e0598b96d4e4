use std::io::{BufRead, Lines};
use std::iter::Peekable;

/// Strips everything from the first `//` on and trims what is left.
pub fn normalize(line: &str) -> &str {
    let code = match line.find("//") {
        Some(start) => &line[..start],
        None => line,
    };
    code.trim()
}

/// Cursor over the raw lines of a VM source.
///
/// The reader is dropped as soon as the last line has been consumed, so an
/// exhausted source no longer holds its file open.
pub struct LineSource<R: BufRead> {
    lines: Option<Peekable<Lines<R>>>,
    line_number: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        LineSource {
            lines: Some(reader.lines().peekable()),
            line_number: 0,
        }
    }

    /// True while at least one raw line, blank or not, is left.
    pub fn has_more_lines(&mut self) -> bool {
        let more = match self.lines.as_mut() {
            Some(lines) => lines.peek().is_some(),
            None => false,
        };
        if !more {
            self.lines = None;
        }
        more
    }

    /// Returns the next non-empty normalized line with its 1-based number, or
    /// `None` if only blank and comment lines were left.
    pub fn advance(&mut self) -> std::io::Result<Option<(usize, String)>> {
        while let Some(lines) = self.lines.as_mut() {
            let line = match lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.lines = None;
                    return Err(e);
                }
                None => {
                    self.lines = None;
                    break;
                }
            };
            self.line_number += 1;

            let text = normalize(&line);
            if !text.is_empty() {
                return Ok(Some((self.line_number, text.to_string())));
            }
        }
        Ok(None)
    }

    #[cfg(test)]
    fn is_exhausted(&self) -> bool {
        self.lines.is_none()
    }
}
