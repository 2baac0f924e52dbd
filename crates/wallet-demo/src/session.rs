#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII ownership of raw mode, the alternate screen, mouse capture, bracketed
//! paste, and focus reporting. Every mode entered is tracked and left again
//! in reverse order on drop, after a panic, or on SIGINT/SIGTERM.
//!
//! # Cleanup Order
//!
//! 1. Disable focus events and bracketed paste.
//! 2. Disable mouse capture (if enabled).
//! 3. Show the cursor.
//! 4. Leave the alternate screen.
//! 5. Exit raw mode, then flush.

use std::io::{self, Stdout, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, event, queue, terminal};
use tracing::{debug, info, warn};

use crate::input::{Input, map_event};
use crate::paint::Canvas;

/// An active terminal session. Dropping it restores the terminal.
#[derive(Debug)]
pub struct TerminalSession {
    stdout: Stdout,
    alternate_screen: bool,
    mouse: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen, optionally with mouse
    /// capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses any of the modes.
    pub fn new(mouse_capture: bool) -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        info!("terminal raw mode enabled");

        let mut session = Self {
            stdout: io::stdout(),
            alternate_screen: false,
            mouse: false,
            #[cfg(unix)]
            signal_guard: Some(SignalGuard::new()?),
        };

        crossterm::execute!(
            session.stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableBracketedPaste,
            event::EnableFocusChange
        )?;
        session.alternate_screen = true;

        if mouse_capture {
            crossterm::execute!(session.stdout, event::EnableMouseCapture)?;
            session.mouse = true;
            info!("mouse capture enabled");
        }
        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(None)` on timeout or for input
    /// the wallet ignores.
    pub fn next_input(&self, timeout: Duration) -> io::Result<Option<Input>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(event::read()?))
    }

    /// Write the whole canvas to the terminal.
    pub fn present(&mut self, canvas: &Canvas) -> io::Result<()> {
        let out = &mut self.stdout;
        let mut last = None;
        for (y, row) in canvas.rows().enumerate() {
            queue!(out, cursor::MoveTo(0, y as u16))?;
            for cell in row {
                if cell.ch == '\0' {
                    continue;
                }
                let style = (cell.fg, cell.bg, cell.bold);
                if last != Some(style) {
                    queue!(
                        out,
                        SetAttribute(Attribute::Reset),
                        SetForegroundColor(cell.fg),
                        SetBackgroundColor(cell.bg)
                    )?;
                    if cell.bold {
                        queue!(out, SetAttribute(Attribute::Bold))?;
                    }
                    last = Some(style);
                }
                queue!(out, Print(cell.ch))?;
            }
        }
        queue!(out, SetAttribute(Attribute::Reset))?;
        out.flush()
    }

    /// Ring the terminal bell.
    pub fn bell() {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(b"\x07");
        let _ = stdout.flush();
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let _ = crossterm::execute!(
            self.stdout,
            event::DisableFocusChange,
            event::DisableBracketedPaste
        );
        if self.mouse {
            let _ = crossterm::execute!(self.stdout, event::DisableMouseCapture);
            self.mouse = false;
        }
        let _ = crossterm::execute!(self.stdout, cursor::Show);
        if self.alternate_screen {
            let _ = crossterm::execute!(self.stdout, terminal::LeaveAlternateScreen);
            self.alternate_screen = false;
        }
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
        info!("terminal restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(
        stdout,
        event::DisableFocusChange,
        event::DisableBracketedPaste,
        event::DisableMouseCapture,
        cursor::Show,
        terminal::LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        use signal_hook::consts::signal::{SIGINT, SIGTERM};

        let mut signals =
            signal_hook::iterator::Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                warn!(signal, "termination signal received, cleaning up");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
            debug!("signal guard closed");
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
