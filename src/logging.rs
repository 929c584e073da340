//! `log` sink owned by the library.
//!
//! Embedders pick where records go (nowhere, stderr, or a C callback) and the
//! maximum level. If the host process already installed its own `log` logger we
//! leave it alone and only steer the global max level.

use crate::common::types::{PlatformLogLevel, PlatformLogRecord, PlatformStatus, PlatformStringView};

use core::ffi::{c_char, c_void};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::{Mutex, OnceLock};

pub type PlatformLogCallback =
    Option<extern "C" fn(record: *const PlatformLogRecord, user_data: *mut c_void)>;

#[derive(Copy, Clone)]
enum Sink {
    Disabled,
    Stderr,
    Callback {
        callback: extern "C" fn(record: *const PlatformLogRecord, user_data: *mut c_void),
        user_data: usize,
    },
}

struct SinkState {
    sink: Sink,
    level: LevelFilter,
}

pub struct PlatformLogger {
    state: Mutex<SinkState>,
}

impl PlatformLogger {
    const fn new() -> Self {
        Self {
            state: Mutex::new(SinkState {
                sink: Sink::Disabled,
                level: LevelFilter::Off,
            }),
        }
    }

    fn configure(&self, sink: Option<Sink>, level: LevelFilter) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(sink) = sink {
                state.sink = sink;
            }
            state.level = level;
        }
        log::set_max_level(level);
    }

    fn snapshot(&self) -> Option<(Sink, LevelFilter)> {
        self.state.lock().ok().map(|state| (state.sink, state.level))
    }
}

impl Log for PlatformLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.snapshot()
            .is_some_and(|(_, level)| metadata.level() <= level)
    }

    fn log(&self, record: &Record) {
        // Copy the sink out so the callback runs without our lock held.
        let Some((sink, level)) = self.snapshot() else {
            return;
        };
        if record.level() > level {
            return;
        }

        match sink {
            Sink::Disabled => {}
            Sink::Stderr => {
                eprintln!("[platutils][{}] {}", record.level(), record.args());
            }
            Sink::Callback {
                callback,
                user_data,
            } => {
                let message = record.args().to_string();
                let rec = PlatformLogRecord {
                    level: record.level().into(),
                    target: view_of(record.target()),
                    message: view_of(&message),
                    file: view_of(record.file().unwrap_or("")),
                    line: record.line().unwrap_or(0),
                };
                callback(&rec as *const PlatformLogRecord, user_data as *mut c_void);
            }
        }
    }

    fn flush(&self) {}
}

impl From<PlatformLogLevel> for LevelFilter {
    fn from(level: PlatformLogLevel) -> Self {
        match level {
            PlatformLogLevel::Off => LevelFilter::Off,
            PlatformLogLevel::Error => LevelFilter::Error,
            PlatformLogLevel::Warn => LevelFilter::Warn,
            PlatformLogLevel::Info => LevelFilter::Info,
            PlatformLogLevel::Debug => LevelFilter::Debug,
            PlatformLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl From<Level> for PlatformLogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => PlatformLogLevel::Error,
            Level::Warn => PlatformLogLevel::Warn,
            Level::Info => PlatformLogLevel::Info,
            Level::Debug => PlatformLogLevel::Debug,
            Level::Trace => PlatformLogLevel::Trace,
        }
    }
}

fn view_of(value: &str) -> PlatformStringView {
    PlatformStringView {
        ptr: value.as_ptr() as *const c_char,
        len: value.len(),
    }
}

static LOGGER: PlatformLogger = PlatformLogger::new();
static OWNS_FACADE: OnceLock<bool> = OnceLock::new();

/// Installs our logger on first use. Returns false when another logger got there first.
fn owns_facade() -> bool {
    *OWNS_FACADE.get_or_init(|| match log::set_logger(&LOGGER) {
        Ok(()) => {
            log::set_max_level(LevelFilter::Off);
            true
        }
        Err(_) => false,
    })
}

pub fn log_set_stderr(level: PlatformLogLevel) -> PlatformStatus {
    if !owns_facade() {
        return PlatformStatus::IoError;
    }
    LOGGER.configure(Some(Sink::Stderr), level.into());
    PlatformStatus::Ok
}

pub fn log_set_callback(
    callback: PlatformLogCallback,
    user_data: *mut c_void,
    level: PlatformLogLevel,
) -> PlatformStatus {
    let Some(callback) = callback else {
        return log_disable();
    };
    if !owns_facade() {
        return PlatformStatus::IoError;
    }
    let sink = Sink::Callback {
        callback,
        user_data: user_data as usize,
    };
    LOGGER.configure(Some(sink), level.into());
    PlatformStatus::Ok
}

pub fn log_set_level(level: PlatformLogLevel) -> PlatformStatus {
    if owns_facade() {
        LOGGER.configure(None, level.into());
    } else {
        log::set_max_level(level.into());
    }
    PlatformStatus::Ok
}

pub fn log_disable() -> PlatformStatus {
    if owns_facade() {
        LOGGER.configure(Some(Sink::Disabled), LevelFilter::Off);
    } else {
        log::set_max_level(LevelFilter::Off);
    }
    PlatformStatus::Ok
}
