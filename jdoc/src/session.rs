//! Interactive session driving the documentation surface from typed commands.
//!
//! Input lines and simulator completions are multiplexed on one task. A
//! simulation runs as its own task and reports back over a channel, so the
//! prompt stays live while it sleeps; whichever completion arrives last is
//! the one the form shows.

use std::io::Write;

use anyhow::{Context, Result};
use jdoc_core::clipboard::Clipboard;
use jdoc_core::codegen::Lang;
use jdoc_core::model::Site;
use jdoc_core::simulate::{simulate, SimulationResult};
use jdoc_core::surface::{CopyTarget, Surface};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::render::Renderer;

const HELP: &str = "\
commands:
  select <id>        open a section
  tab <lang>         switch code sample (HTTP, JavaScript, PHP, Python, Go)
  menu               toggle the navigation menu
  close              close the navigation menu
  code               toggle code samples in place of the details
  input <json>       set the simulator payload
  simulate           run the simulator on the current payload
  copy <target>      snippet | url | request [n] | response [n]
                     | error-request [n] | error-response [n] | code [n]
  show               render the current view
  help               show this message
  quit               leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Tab(Lang),
    Menu,
    Close,
    Code,
    Input(String),
    Simulate,
    Copy(CopyTarget),
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "select" | "s" => {
            if rest.is_empty() {
                return Err("usage: select <id>".to_string());
            }
            Command::Select(rest.to_string())
        }
        "tab" | "t" => Command::Tab(rest.parse().map_err(|e| format!("{}", e))?),
        "menu" => Command::Menu,
        "close" => Command::Close,
        "code" => Command::Code,
        "input" => Command::Input(rest.to_string()),
        "simulate" | "sim" => Command::Simulate,
        "copy" | "c" => Command::Copy(parse_copy_target(rest)?),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command: {}. Type `help` for a list", other)),
    };
    Ok(Some(command))
}

/// `snippet`, `url`, or a kind followed by an optional zero-based index.
pub fn parse_copy_target(spec: &str) -> Result<CopyTarget, String> {
    let mut parts = spec.split_whitespace();
    let kind = parts.next().unwrap_or("snippet");
    let index = match parts.next() {
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| format!("invalid index: {}", n))?,
        None => 0,
    };

    let target = match kind {
        "snippet" => CopyTarget::Snippet,
        "url" => CopyTarget::Url,
        "request" => CopyTarget::ExampleRequest(index),
        "response" => CopyTarget::ExampleResponse(index),
        "error-request" => CopyTarget::ErrorRequest(index),
        "error-response" => CopyTarget::ErrorResponse(index),
        "code" => CopyTarget::PageCode(index),
        other => return Err(format!("unknown copy target: {}", other)),
    };
    Ok(target)
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a, W: Write> {
    surface: Surface<'a>,
    renderer: Box<dyn Renderer>,
    clipboard: Box<dyn Clipboard>,
    out: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(site: &'a Site, renderer: Box<dyn Renderer>, clipboard: Box<dyn Clipboard>, out: W) -> Self {
        Self {
            surface: Surface::new(site),
            renderer,
            clipboard,
            out,
        }
    }

    /// Process `input` until it ends (and pending simulations finish) or
    /// `quit` is read. Returns the output sink.
    pub async fn run<R>(mut self, input: R) -> Result<W>
    where
        R: AsyncBufRead + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<SimulationResult>();
        let mut lines = input.lines();
        let mut reading = true;

        self.show()?;
        loop {
            if !reading && !self.surface.simulator().in_flight() {
                break;
            }
            tokio::select! {
                line = lines.next_line(), if reading => {
                    match line.context("failed to read input")? {
                        Some(line) => match parse_command(&line) {
                            Ok(Some(command)) => {
                                if self.apply(command, &tx)? == Flow::Quit {
                                    break;
                                }
                            }
                            Ok(None) => {}
                            Err(message) => writeln!(self.out, "error: {}", message)?,
                        },
                        None => {
                            debug!("input closed");
                            reading = false;
                        }
                    }
                }
                Some(result) = rx.recv() => self.finish(result)?,
            }
        }

        self.out.flush()?;
        Ok(self.out)
    }

    fn apply(&mut self, command: Command, tx: &UnboundedSender<SimulationResult>) -> Result<Flow> {
        debug!(?command, "command");
        match command {
            Command::Select(id) => {
                self.surface.state_mut().select(id);
                self.show()?;
            }
            Command::Tab(lang) => {
                self.surface.state_mut().select_tab(lang);
                self.show()?;
            }
            Command::Menu => {
                self.surface.state_mut().toggle_mobile_menu();
                self.show()?;
            }
            Command::Close => {
                self.surface.state_mut().close_mobile_menu();
                self.show()?;
            }
            Command::Code => {
                self.surface.state_mut().toggle_code_samples();
                self.show()?;
            }
            Command::Input(payload) => {
                self.surface.simulator_mut().set_input(payload);
                writeln!(self.out, "input set")?;
            }
            Command::Simulate => {
                let raw = self.surface.simulator_mut().begin();
                let tx = tx.clone();
                tokio::spawn(async move {
                    // The receiver is gone only if the session already ended.
                    let _ = tx.send(simulate(&raw).await);
                });
                info!(pending = self.surface.simulator().pending(), "simulation started");
                writeln!(self.out, "simulating...")?;
            }
            Command::Copy(target) => match self.surface.copy(target, self.clipboard.as_mut()) {
                Some(notice) => writeln!(self.out, "{}: {}", notice.title, notice.description)?,
                None => writeln!(self.out, "nothing to copy for {:?} here", target)?,
            },
            Command::Show => self.show()?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn finish(&mut self, result: SimulationResult) -> Result<()> {
        self.surface.simulator_mut().complete(result);
        if let Some(result) = self.surface.simulator().result() {
            let json = serde_json::to_string_pretty(result).context("failed to serialize result")?;
            writeln!(self.out, "result:\n{}", json)?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        let rendered = self.renderer.render(&self.surface);
        self.out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}
