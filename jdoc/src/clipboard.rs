//! System clipboard via external commands.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use jdoc_core::clipboard::Clipboard;
use tracing::debug;

/// Tried in order until one of them exists.
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("pbcopy", &[]),
];

/// Pipes copied text into a clipboard command's stdin.
pub struct CommandClipboard {
    /// Shell command given by the user; replaces the built-in candidates.
    custom: Option<String>,
}

impl CommandClipboard {
    pub fn new(custom: Option<String>) -> Self {
        Self {
            custom: custom.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if let Some(custom) = &self.custom {
            let mut command = Command::new("sh");
            command.arg("-c").arg(custom);
            return pipe_into(command, text);
        }

        for (program, args) in CANDIDATES {
            let mut command = Command::new(program);
            command.args(*args);
            match pipe_into(command, text) {
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(program, "clipboard command not available");
                }
                result => return result,
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no clipboard command found (tried wl-copy, xclip, pbcopy)",
        ))
    }
}

fn pipe_into(mut command: Command, text: &str) -> io::Result<()> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text.as_bytes())?;
    }
    let status = child.wait()?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("clipboard command exited with {}", status),
        ));
    }
    Ok(())
}
