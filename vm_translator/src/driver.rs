use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::codegen::Passthrough;
use crate::error::Result;
use crate::parser::Parser;
use crate::translator::{OnMalformed, Summary, Translator};

/// A problem with how the translator was invoked. Reported to the user, never
/// raised as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    ArgumentCount,
    NoSuchFile,
    InvalidExtension,
    LowercaseName,
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            UsageError::ArgumentCount => "Invalid number of arguments",
            UsageError::NoSuchFile => "No such file or directory",
            UsageError::InvalidExtension => "Invalid file extension",
            UsageError::LowercaseName => "First character in file name must be an uppercase letter",
        };
        write!(f, "{}", message)
    }
}

/// Checks `input` and returns where its translation goes.
pub fn output_path(input: &Path) -> std::result::Result<PathBuf, UsageError> {
    if !input.exists() {
        return Err(UsageError::NoSuchFile);
    }
    if input.extension().and_then(|ext| ext.to_str()) != Some("vm") {
        return Err(UsageError::InvalidExtension);
    }
    let starts_uppercase = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.chars().next())
        .map_or(false, char::is_uppercase);
    if !starts_uppercase {
        return Err(UsageError::LowercaseName);
    }
    Ok(input.with_extension("asm"))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Config {
    pub on_malformed: OnMalformed,
    pub dump: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Translated { output: PathBuf, summary: Summary },
    Rejected(UsageError),
}

/// Translates one `.vm` file into its sibling `.asm` file.
pub fn translate_file(input: &Path, config: &Config) -> Result<Outcome> {
    let output = match output_path(input) {
        Ok(output) => output,
        Err(usage) => return Ok(Outcome::Rejected(usage)),
    };
    info!("translating {} to {}", input.display(), output.display());

    let mut parser = Parser::open(input)?;
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let mut translator = Translator::new(Passthrough).on_malformed(config.on_malformed);
    if config.dump {
        translator = translator.dump_to(&mut stdout);
    }
    let summary = write_atomically(&output, |out| translator.translate(&mut parser, out))?;

    info!(
        "wrote {} lines for {} commands ({} skipped)",
        summary.lines_written, summary.commands, summary.skipped
    );
    Ok(Outcome::Translated { output, summary })
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

/// Writes through a temporary sibling that only replaces `path` on success.
///
/// The temporary is created exclusively; an existing file of that name is
/// never touched.
fn write_atomically<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<T>,
) -> Result<T> {
    let temporary = temporary_path(path);
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temporary)?;

    let result = write_then_rename(file, &temporary, path, write);
    if result.is_err() {
        debug!("removing {}", temporary.display());
        if let Err(e) = fs::remove_file(&temporary) {
            warn!("could not remove {}: {}", temporary.display(), e);
        }
    }
    result
}

fn write_then_rename<T>(
    file: File,
    temporary: &Path,
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> Result<T>,
) -> Result<T> {
    let mut out = BufWriter::new(file);
    let value = write(&mut out)?;
    out.flush()?;
    drop(out);
    fs::rename(temporary, path)?;
    Ok(value)
}
