use std::ffi::OsString;
use std::io::Write;

use log::{debug, error, info};
use structopt::clap::ErrorKind;
use structopt::StructOpt;

use vm_translator::{translate_file, Config, OnMalformed, Outcome, UsageError};

/// Translates a single `.vm` file into a `.asm` file next to it.
#[derive(StructOpt)]
struct Options {
    file: std::path::PathBuf,

    /// Skip malformed lines instead of aborting the translation.
    #[structopt(long)]
    keep_going: bool,

    /// Print every parsed command as a JSON line on stdout.
    #[structopt(long)]
    dump: bool,
}

type DynResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn main() -> DynResult<()> {
    pretty_env_logger::init();

    let stdout = std::io::stdout();
    if let Err(e) = run(std::env::args_os(), &mut stdout.lock()) {
        error!("{}", e);
        eprintln!("Translation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Usage problems are written to `out` and end the run successfully.
fn run<I, W>(args: I, out: &mut W) -> DynResult<()>
where
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
    W: Write,
{
    let options = match Options::from_iter_safe(args) {
        Ok(options) => options,
        Err(e) if matches!(e.kind, ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed) => {
            writeln!(out, "{}", e.message)?;
            return Ok(());
        }
        Err(e) => {
            debug!("{}", e.message);
            writeln!(out, "{}", UsageError::ArgumentCount)?;
            return Ok(());
        }
    };

    let config = Config {
        on_malformed: if options.keep_going {
            OnMalformed::Skip
        } else {
            OnMalformed::Abort
        },
        dump: options.dump,
    };

    match translate_file(&options.file, &config)? {
        Outcome::Rejected(usage) => writeln!(out, "{}", usage)?,
        Outcome::Translated { output, summary } => {
            info!("{} commands written to {}", summary.commands, output.display());
        }
    }

    Ok(())
}
