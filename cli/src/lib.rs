//! Front-end support for the `rulegen` binary.
//!
//! The binary owns terminal I/O; this crate holds the parts that are plain data in, plain data
//! out: REPL command parsing, TUI key bindings, text rendering of an [`rulegen::App`] and the
//! one-shot `generate` flow.

pub mod command;
pub mod error;
pub mod generate;
pub mod keymap;
pub mod render;

pub use command::{parse_repl_line, ReplCommand, REPL_HELP};
pub use error::CliError;
pub use generate::{run_generate, GenerateOptions, GenerateOutput};
pub use keymap::{action_for_key, Action, Focus};

/// Converts a user-facing 1-based example number into an index into [`rulegen::EXAMPLES`].
pub fn example_index(number: usize) -> Result<usize, CliError> {
    if (1..=rulegen::EXAMPLES.len()).contains(&number) {
        Ok(number - 1)
    } else {
        Err(CliError::ExampleOutOfRange {
            number,
            max: rulegen::EXAMPLES.len(),
        })
    }
}
