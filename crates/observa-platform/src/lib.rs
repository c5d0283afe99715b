//! Headless platform runner.
//!
//! Mounts a root component, prints each frame as an indented outline and
//! reads one command per line:
//!
//! ```text
//! tap <label>     press a button or alert action
//! inc <label>     increment a stepper
//! dec <label>     decrement a stepper
//! dismiss         swipe the topmost sheet away
//! tick [n]        advance animations by n frame steps (default 1)
//! print           print the current frame
//! quit
//! ```
//!
//! Labels match by prefix. Animation time is driven by `tick` only, so a
//! script always produces the same output.

pub mod render;

use std::io::{BufRead, Write};
use std::rc::Rc;

use anyhow::{Context, bail};
use observa_core::{Component, Evaluator, Interaction, ManualClock};
use web_time::Duration;

pub use render::render_text;

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Print the frame after every command that changes it.
    pub print_frames: bool,
    /// Clock advance per `tick`.
    pub frame_step: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            print_frames: true,
            frame_step: Duration::from_millis(16),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Dispatch(Interaction),
    Tick(u32),
    Print,
    Quit,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let label = |verb: &str| -> anyhow::Result<String> {
        if rest.is_empty() {
            bail!("`{verb}` needs a label");
        }
        Ok(rest.to_string())
    };
    let cmd = match verb {
        "tap" => Command::Dispatch(Interaction::Tap(label(verb)?)),
        "inc" => Command::Dispatch(Interaction::Increment(label(verb)?)),
        "dec" => Command::Dispatch(Interaction::Decrement(label(verb)?)),
        "dismiss" => Command::Dispatch(Interaction::Dismiss),
        "tick" if rest.is_empty() => Command::Tick(1),
        "tick" => Command::Tick(
            rest.parse()
                .with_context(|| format!("invalid tick count `{rest}`"))?,
        ),
        "print" => Command::Print,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}`"),
    };
    Ok(Some(cmd))
}

pub struct Headless {
    evaluator: Evaluator,
    clock: ManualClock,
    config: RunnerConfig,
}

impl Headless {
    pub fn new(root: Component, config: RunnerConfig) -> Self {
        let clock = ManualClock::new();
        let mut evaluator = Evaluator::with_clock(Rc::new(clock.clone()));
        evaluator.mount(root);
        Self {
            evaluator,
            clock,
            config,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Apply one command. Returns `false` once the script asked to quit.
    pub fn step<W: Write>(&mut self, cmd: Command, out: &mut W) -> anyhow::Result<bool> {
        match cmd {
            Command::Dispatch(interaction) => match self.evaluator.dispatch(&interaction) {
                Ok(()) => {
                    if self.config.print_frames {
                        self.print(out)?;
                    }
                }
                Err(err) => {
                    log::warn!("{err}");
                    writeln!(out, "! {err}")?;
                }
            },
            Command::Tick(n) => {
                for _ in 0..n {
                    self.clock.advance(self.config.frame_step);
                    if !self.evaluator.advance() {
                        break;
                    }
                }
                if self.config.print_frames {
                    self.print(out)?;
                }
            }
            Command::Print => self.print(out)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        write!(out, "{}", render_text(&self.evaluator.frame()))?;
        writeln!(out, "---")?;
        Ok(())
    }

    /// Print the initial frame, then run commands until EOF or `quit`.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> anyhow::Result<()> {
        self.print(&mut out)?;
        for line in input.lines() {
            let line = line.context("reading command")?;
            match parse_command(&line) {
                Ok(Some(cmd)) => {
                    if !self.step(cmd, &mut out)? {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("{err:#}");
                    writeln!(out, "! {err:#}")?;
                }
            }
            out.flush()?;
        }
        log::info!("headless runner finished");
        Ok(())
    }
}

/// Run `root` against stdin/stdout.
pub fn run_headless_app(root: Component, config: RunnerConfig) -> anyhow::Result<()> {
    log::info!("mounting {}", root.name);
    let mut app = Headless::new(root, config);
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    app.run(stdin.lock(), stdout.lock())
}
