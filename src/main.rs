use anyhow::{Context, Result};
use fs2::FileExt;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    fs::File,
    io::{self, Write},
    os::unix::io::AsRawFd,
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};
use termios::{os::linux::ECHOCTL, *};

use sundown::args::{CliAction, ParsedArgs};
use sundown::backend::{self, DisplayAdapter};
use sundown::color::kelvin_to_rgb_strict;
use sundown::config::Config;
use sundown::constants::{EXIT_FAILURE, NEUTRAL_TEMP};
use sundown::logger::Log;
use sundown::scheduler::Scheduler;

/// Manages terminal state to hide cursor and suppress control character
/// echoing.
///
/// This struct automatically restores the original terminal state when
/// dropped, ensuring clean cleanup even if the program exits unexpectedly.
struct TerminalGuard {
    original_termios: Termios,
}

impl TerminalGuard {
    /// Create a new terminal guard and modify terminal settings.
    ///
    /// # Returns
    /// - `Ok(Some(guard))` if terminal is available and settings were applied
    /// - `Ok(None)` if no terminal is available (e.g., running as a service)
    /// - `Err` only for unexpected errors
    fn new() -> io::Result<Option<Self>> {
        // Try to open the controlling tty - if it fails, we're likely headless
        let tty = match File::open("/dev/tty") {
            Ok(tty) => tty,
            Err(e) if e.kind() == io::ErrorKind::NotFound || e.raw_os_error() == Some(6) => {
                // No controlling terminal (common in systemd services)
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let fd = tty.as_raw_fd();

        // Take a snapshot of the current settings for restoration
        let mut term = Termios::from_fd(fd)?;
        let original = term;

        // Disable the "^C" echo to prevent visual noise during shutdown
        term.c_lflag &= !ECHOCTL;
        tcsetattr(fd, TCSANOW, &term)?;

        // Hide the cursor for cleaner output display
        print!("\x1b[?25l");
        io::stdout().flush()?;

        Ok(Some(Self {
            original_termios: original,
        }))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Best-effort restore of termios + cursor visibility
        if let Ok(tty) = File::open("/dev/tty") {
            let _ = tcsetattr(tty.as_raw_fd(), TCSANOW, &self.original_termios);
        }
        let _ = write!(io::stdout(), "\x1b[?25h");
        let _ = io::stdout().flush();
    }
}

fn print_help() {
    println!("sundown {} - screen color temperature scheduler", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: sundown [COMMAND] [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  set <kelvin|preset>   Apply a temperature once and exit");
    println!("                        (presets: day, night, sunset, candle)");
    println!("  reset                 Restore the neutral 6500K state");
    println!("  run                   Run the automatic scheduler");
    println!();
    println!("Options:");
    println!("  -d, --debug           Enable debug output");
    println!("  -h, --help            Show this help");
    println!("  -V, --version         Show version");
    println!();
    println!("The scheduler is configured through sundown.toml; a commented");
    println!("default file is created on first run.");
}

/// Apply a single temperature through the display adapter and exit.
///
/// One-shot application is strict about its input: out-of-range values are
/// rejected rather than clamped.
fn apply_once(kelvin: u32) -> Result<()> {
    let gain = kelvin_to_rgb_strict(kelvin)?;
    let mut adapter = backend::create_adapter()?;
    adapter.apply(gain)?;
    println!("Set color temperature to {}K", kelvin);
    Ok(())
}

/// Run the scheduler until a shutdown signal arrives.
fn run(debug_enabled: bool) -> Result<()> {
    Log::log_version();

    if debug_enabled {
        Log::log_pipe();
        Log::log_debug("Debug mode enabled");
    }

    // Single-instance lock under the runtime directory
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let lock_path = format!("{}/sundown.lock", runtime_dir);
    let lock_file = File::create(&lock_path)
        .with_context(|| format!("failed to create lock file {}", lock_path))?;
    if lock_file.try_lock_exclusive().is_err() {
        Log::log_error(
            "Another instance of sundown is already running.\n\
            • Kill sundown before restarting.",
        );
        std::process::exit(EXIT_FAILURE);
    }
    Log::log_decorated("Lock acquired, starting sundown...");

    // Signal handling flips the running flag; the main loop does the rest
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    thread::spawn(move || {
        for signal in signals.forever() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    let config = Config::load()?;
    config.log_config();

    let adapter = backend::create_adapter()?;
    Log::log_decorated(&format!("Display adapter: {}", adapter.name()));

    let mut scheduler = Scheduler::from_config(&config, None, adapter)?;
    scheduler.on_change(|kelvin| {
        Log::log_decorated(&format!("Color temperature set to {}K", kelvin));
    });
    scheduler.start()?;

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    Log::log_block_start("Shutting down sundown...");
    scheduler.stop();
    match scheduler.reset_display() {
        Ok(()) => Log::log_decorated(&format!("Display reset to {}K", NEUTRAL_TEMP)),
        Err(e) => Log::log_warning(&format!("Failed to reset display: {}", e)),
    }

    drop(lock_file);
    if let Err(e) = std::fs::remove_file(&lock_path) {
        Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e));
    }
    Log::log_end();

    Ok(())
}

fn main() -> Result<()> {
    // Gracefully handles cases where no terminal is available
    let _term = TerminalGuard::new().context("failed to initialize terminal features")?;

    let parsed = ParsedArgs::parse(std::env::args());
    match parsed.action {
        CliAction::ShowVersion => {
            println!("sundown {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::ShowHelp => {
            print_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            print_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Set { kelvin } => apply_once(kelvin),
        CliAction::Reset => apply_once(NEUTRAL_TEMP),
        CliAction::Run { debug_enabled } => run(debug_enabled),
    }
}
