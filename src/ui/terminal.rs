//! Terminal setup and the blocking key reader.

use crate::app::Msg;
use crate::ui::settings;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io::{self, IsTerminal};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = stdout
            .execute(EnterAlternateScreen)
            .and_then(|out| out.execute(Hide))
        {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(Show);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Whether stdin and stdout are both attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Current size, or 80x24 when it cannot be read.
pub fn size() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

/// Forward key and resize events to the loop until it stops listening.
pub fn spawn_input_thread(tx: mpsc::UnboundedSender<Msg>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("codely-input".into())
        .spawn(move || {
            let poll = Duration::from_millis(settings::INPUT_POLL_MS);
            loop {
                if tx.is_closed() {
                    break;
                }
                match event::poll(poll) {
                    Ok(false) => continue,
                    Ok(true) => {}
                    Err(e) => {
                        debug!(error = %e, "input poll failed");
                        break;
                    }
                }
                let msg = match event::read() {
                    Ok(Event::Key(key)) => Msg::Key(key),
                    Ok(Event::Resize(..)) => Msg::Resize,
                    Ok(_) => continue,
                    Err(e) => {
                        debug!(error = %e, "input read failed");
                        break;
                    }
                };
                if tx.send(msg).is_err() {
                    break;
                }
            }
        })
}
