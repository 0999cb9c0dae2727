//! # Command Builder
//!
//! Turns the selected interpreter and the launcher's arguments into the single command
//! line handed to the command processor.
//!
//! - **ImportCall**: `<python> -c "import pydatview; pydatview.show(filenames=['a','b']);"`
//!   Backslashes in arguments become forward slashes so Windows paths survive inside the
//!   Python string literal.
//! - **DirectScript**: `pythonw <checkout>\pyDatView.py "a" "b" `, arguments untouched.

use anyhow::{bail, Result};

use crate::discovery::{Candidate, InvocationMode};
use crate::invariant_ppt::{assert_invariant, INV_NO_BACKSLASH};
use crate::profile::Profile;

/// Longest command line `cmd.exe` accepts.
pub const MAX_COMMAND_LINE: usize = 8191;

/// Encodes arguments as a Python list literal of single-quoted strings.
pub fn encode_import_args(args: &[String]) -> String {
    let items: Vec<String> = args
        .iter()
        .map(|arg| format!("'{}'", arg.replace('\\', "/")))
        .collect();
    let list = format!("[{}]", items.join(","));

    assert_invariant(!list.contains('\\'), INV_NO_BACKSLASH, Some("Command"));
    list
}

/// Encodes arguments as double-quoted words, each followed by a space.
pub fn encode_script_args(args: &[String]) -> String {
    args.iter().map(|arg| format!("\"{}\" ", arg)).collect()
}

/// Builds the full command line for `candidate`.
///
/// Fails if the result would not fit on a `cmd.exe` command line.
pub fn build_command_line(profile: &Profile, candidate: &Candidate, args: &[String]) -> Result<String> {
    let line = match candidate.mode {
        InvocationMode::ImportCall => {
            let module = profile.app_module;
            format!(
                "{} -c \"import {}; {}.show(filenames={});\"",
                candidate.interpreter,
                module,
                module,
                encode_import_args(args)
            )
        }
        InvocationMode::DirectScript => {
            let script = match &candidate.script {
                Some(s) => s,
                None => bail!("DirectScript candidate without a script path"),
            };
            format!("{} {} {}", candidate.interpreter, script, encode_script_args(args))
        }
    };

    let length = line.chars().count();
    if length > MAX_COMMAND_LINE {
        bail!(
            "Command line is {} characters long, the limit is {}. Pass fewer files.",
            length,
            MAX_COMMAND_LINE
        );
    }
    Ok(line)
}
