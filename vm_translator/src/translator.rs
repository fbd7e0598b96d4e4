use std::io::{BufRead, Write};

use log::warn;
use serde::Serialize;
use vm_command::Command;

use crate::codegen::CodeGenerator;
use crate::error::Result;
use crate::parser::Parser;

/// Every output record ends with CRLF, whatever the host platform uses.
pub const LINE_ENDING: &str = "\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMalformed {
    Abort,
    Skip,
}

impl Default for OnMalformed {
    fn default() -> Self {
        OnMalformed::Abort
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub commands: usize,
    pub skipped: usize,
    pub lines_written: usize,
}

#[derive(Serialize)]
struct DumpRecord<'c> {
    line: usize,
    #[serde(flatten)]
    command: &'c Command,
}

pub struct Translator<'d, G> {
    generator: G,
    on_malformed: OnMalformed,
    dump: Option<&'d mut dyn Write>,
}

impl<'d, G: CodeGenerator> Translator<'d, G> {
    pub fn new(generator: G) -> Self {
        Translator {
            generator,
            on_malformed: OnMalformed::default(),
            dump: None,
        }
    }

    pub fn on_malformed(mut self, policy: OnMalformed) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Also writes each parsed command as one JSON object per line.
    pub fn dump_to(mut self, sink: &'d mut dyn Write) -> Self {
        self.dump = Some(sink);
        self
    }

    pub fn translate<R: BufRead, W: Write>(
        &mut self,
        parser: &mut Parser<R>,
        out: &mut W,
    ) -> Result<Summary> {
        let mut summary = Summary::default();

        while parser.has_more_lines() {
            match parser.advance() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e) if e.is_malformed() && self.on_malformed == OnMalformed::Skip => {
                    warn!("skipping {}", e);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }

            let command = parser.current()?;
            if let Some(sink) = self.dump.as_mut() {
                let record = DumpRecord {
                    line: parser.line_number().unwrap_or_default(),
                    command,
                };
                serde_json::to_writer(&mut **sink, &record)?;
                sink.write_all(b"\n")?;
            }

            for line in self.generator.generate(command) {
                out.write_all(line.as_bytes())?;
                out.write_all(LINE_ENDING.as_bytes())?;
                summary.lines_written += 1;
            }
            summary.commands += 1;
        }

        Ok(summary)
    }
}
