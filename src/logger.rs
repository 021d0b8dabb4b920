//! Structured logging with box-drawing layout.
//!
//! Output is organised into visual blocks:
//!
//! ```text
//! ┏ athkari v0.4.0 ━━╸
//! ┃
//! ┣ Loaded configuration
//! ┃   Location: 21.4225°N, 39.8262°E
//! ┃
//! ┣[INFO] Active routine: After Fajr
//! ╹
//! ```
//!
//! ## Conventions
//!
//! - **`log_block_start!`** opens a new block (adds a spacer pipe first). Use it for phase
//!   changes such as loading configuration or announcing a new routine.
//! - **`log_decorated!`** continues the current block with `┣ message`.
//! - **`log_indented!`** prints nested details as `┃   message`.
//! - **`log_pipe!`** inserts a spacer, mainly before a `[LEVEL]` message that starts its own
//!   group. Avoid it directly before `log_block_start!` or `log_end!`.
//! - **`log_version!`** / **`log_end!`** frame a whole run.
//! - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`, `log_critical!`** carry a
//!   colored `[LEVEL]` tag for messages where severity matters more than layout.
//!
//! When the time source is simulated every line is prefixed with the simulated wall-clock
//! time so accelerated runs can be read back.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Zone used for simulated timestamps
static DISPLAY_ZONE: OnceLock<chrono_tz::Tz> = OnceLock::new();

// Set when output is routed to a file
static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Severity tags for the `[LEVEL]` macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
    Critical,
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Info => "\x1b[32mINFO\x1b[0m",
            Level::Debug => "\x1b[32mDEBUG\x1b[0m",
            Level::Warning => "\x1b[33mWARNING\x1b[0m",
            Level::Error => "\x1b[31mERROR\x1b[0m",
            Level::Critical => "\x1b[31mCRITICAL\x1b[0m",
        }
    }
}

/// Visual placement of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Decorated,
    Indented,
    BlockStart,
    Tagged(Level),
    /// Tagged line without the pipe, for output outside a block
    Standalone(Level),
    /// Tagged line that closes the log
    Exit(Level),
}

/// Logging control.
pub struct Log;

impl Log {
    /// Enable or disable all output.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Set the zone simulated timestamps are rendered in. Only the first call takes effect.
    pub fn set_display_zone(tz: chrono_tz::Tz) {
        let _ = DISPLAY_ZONE.set(tz);
    }

    /// Route all further output to `file_path` through a writer thread.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;
            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => file.write_all(text.as_bytes())?,
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }
            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while running on a simulated clock, empty otherwise.
    pub fn timestamp_prefix() -> String {
        if !(crate::time_source::is_initialized() && crate::time_source::is_simulated()) {
            return String::new();
        }

        let now = crate::time_source::now();
        match DISPLAY_ZONE.get() {
            Some(tz) => format!("[{}] ", now.with_timezone(tz).format("%H:%M:%S")),
            None => format!("[{}] ", now.format("%H:%M:%S")),
        }
    }
}

/// Flushes and joins the file writer on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for skipped in chars.by_ref() {
                if skipped == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Render a message with the given layout.
pub fn render(layout: Layout, prefix: &str, message: &str) -> String {
    match layout {
        Layout::Decorated => format!("{prefix}┣ {message}\n"),
        Layout::Indented => format!("{prefix}┃   {message}\n"),
        Layout::BlockStart => format!("{prefix}┃\n{prefix}┣ {message}\n"),
        Layout::Tagged(level) => format!("{prefix}┣[{}] {message}\n", level.tag()),
        Layout::Standalone(level) => format!("{prefix}[{}] {message}\n", level.tag()),
        Layout::Exit(level) => format!("{prefix}┃\n{prefix}┗[{}] {message}\n", level.tag()),
    }
}

/// Format and write one message (used by the macros).
pub fn emit(layout: Layout, message: &str) {
    if !Log::is_enabled() {
        return;
    }
    let prefix = Log::timestamp_prefix();
    write_output(&render(layout, &prefix, message));
}

/// Write raw text to stdout or the active log file.
pub fn write_output(text: &str) {
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Write a frame line (`┏ header` or `╹`) honoring the enabled flag and prefix.
pub fn emit_frame(body: &str) {
    if !Log::is_enabled() {
        return;
    }
    let prefix = Log::timestamp_prefix();
    write_output(&format!("{prefix}{body}\n"));
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_with_layout {
    ($layout:expr, $fmt:literal $($arg:tt)*) => {
        $crate::logger::emit($layout, &format!($fmt $($arg)*))
    };
    ($layout:expr, $expr:expr) => {
        $crate::logger::emit($layout, &$expr.to_string())
    };
}

/// Continue the current block: `┣ message`.
#[macro_export]
macro_rules! log_decorated {
    ($($t:tt)+) => { $crate::__log_with_layout!($crate::logger::Layout::Decorated, $($t)+) };
}

/// Nested detail: `┃   message`.
#[macro_export]
macro_rules! log_indented {
    ($($t:tt)+) => { $crate::__log_with_layout!($crate::logger::Layout::Indented, $($t)+) };
}

/// Open a new block with a spacer pipe.
#[macro_export]
macro_rules! log_block_start {
    ($($t:tt)+) => { $crate::__log_with_layout!($crate::logger::Layout::BlockStart, $($t)+) };
}

/// Empty spacer line.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::logger::emit_frame("┃")
    };
}

/// Run header with the package version.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::logger::emit_frame(&format!("┏ athkari v{} ━━╸", env!("CARGO_PKG_VERSION")))
    };
}

/// Final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::logger::emit_frame("╹")
    };
}

#[macro_export]
macro_rules! log_info {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Tagged($crate::logger::Level::Info), $($t)+
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Tagged($crate::logger::Level::Debug), $($t)+
        )
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Tagged($crate::logger::Level::Warning), $($t)+
        )
    };
}

/// Warning printed outside any block.
#[macro_export]
macro_rules! log_warning_standalone {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Standalone($crate::logger::Level::Warning), $($t)+
        )
    };
}

#[macro_export]
macro_rules! log_error {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Tagged($crate::logger::Level::Error), $($t)+
        )
    };
}

/// Error that terminates the log: `┗[ERROR] message`.
#[macro_export]
macro_rules! log_error_exit {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Exit($crate::logger::Level::Error), $($t)+
        )
    };
}

#[macro_export]
macro_rules! log_critical {
    ($($t:tt)+) => {
        $crate::__log_with_layout!(
            $crate::logger::Layout::Tagged($crate::logger::Level::Critical), $($t)+
        )
    };
}
