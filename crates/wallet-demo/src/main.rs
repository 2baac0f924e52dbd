#![forbid(unsafe_code)]

//! Wallet demo binary entry point.

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wallet_core::clock::{Clock, SystemClock};
use wallet_core::event::Event;
use wallet_core::geometry::Rect;
use wallet_demo::bell::BellSink;
use wallet_demo::cli::Opts;
use wallet_demo::error::Result;
use wallet_demo::input::Input;
use wallet_demo::paint::{Canvas, paint};
use wallet_demo::session::TerminalSession;
use wallet_engine::WalletApp;
use wallet_engine::feedback::Feedback;

/// Poll interval while anything is moving.
const FRAME: Duration = Duration::from_millis(16);
/// Poll interval when idle.
const IDLE: Duration = Duration::from_millis(250);

fn main() {
    let opts = Opts::parse();
    if let Err(err) = init_logging(&opts).and_then(|()| run(&opts)) {
        eprintln!("wallet-demo: {err}");
        std::process::exit(1);
    }
}

fn init_logging(opts: &Opts) -> Result<()> {
    let Some(path) = &opts.log else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(opts: &Opts) -> Result<()> {
    let mut session = TerminalSession::new(opts.mouse)?;
    let (width, height) = session.size()?;
    let clock = SystemClock::new();

    let mut app = WalletApp::new(opts.config(), Rect::from_size(width, height))
        .with_feedback(Feedback::none().with_audio(BellSink));
    let mut canvas = Canvas::new(width, height);
    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));
    info!(width, height, cards = opts.cards, "wallet demo running");

    loop {
        let now = clock.now();
        if exit_after.is_some_and(|limit| now >= limit) {
            info!("exit-after elapsed");
            break;
        }
        app.tick(now);
        paint(&mut canvas, &app);
        session.present(&canvas)?;

        let timeout = if app.is_idle() {
            app.next_deadline()
                .map_or(IDLE, |due| due.saturating_sub(clock.now()).min(IDLE))
        } else {
            FRAME
        };
        match session.next_input(timeout)? {
            Some(Input::Quit) => break,
            Some(Input::Event(event)) => {
                if let Event::Resize { width, height } = event {
                    canvas.resize(width, height);
                }
                app.handle_event(&event);
            }
            None => {}
        }
        for signal in app.drain_signals() {
            debug!(?signal, "wallet signal");
        }
    }
    info!(remaining = app.state().store.len(), "wallet demo exiting");
    Ok(())
}
