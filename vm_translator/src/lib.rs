pub mod codegen;
pub mod driver;
pub mod error;
pub mod line_source;
pub mod parser;
pub mod translator;

pub use codegen::{CodeGenerator, Passthrough};
pub use driver::{translate_file, Config, Outcome, UsageError};
pub use error::TranslateError;
pub use parser::Parser;
pub use translator::{OnMalformed, Summary, Translator};
pub use vm_command::{Command, CommandType};
