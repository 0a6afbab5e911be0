/// Ember3D Engine - process-wide configuration and logging
///
/// Holds the engine configuration, the active logger and the log level in
/// static storage. GPU binding state is NOT global: it lives in the explicit
/// `RenderContext` owned by the application.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;

use crate::config::Config;
use crate::engine_err;
use crate::error::Result;
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

const SOURCE: &str = "ember3d::Engine";

/// Configuration, present between `initialize()` and `shutdown()`
static CONFIG: RwLock<Option<Config>> = RwLock::new(None);

/// Installed logger (DefaultLogger until replaced)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are dropped
static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogSeverity::Trace as u8);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Engine-wide settings and log routing
///
/// # Example
///
/// ```no_run
/// use ember_3d_engine::ember3d::{Config, Engine};
///
/// Engine::initialize(Config::default().with_framerate(30))?;
/// let config = Engine::config()?;
/// assert_eq!(config.target_framerate, 30);
/// Engine::shutdown();
/// # Ok::<(), ember_3d_engine::ember3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Store `config` and apply its log level.
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the engine is already initialized.
    pub fn initialize(config: Config) -> Result<()> {
        let mut current = CONFIG
            .write()
            .map_err(|_| engine_err!(SOURCE, "Engine configuration lock poisoned"))?;

        if current.is_some() {
            return Err(engine_err!(SOURCE, InitializationFailed,
                "Engine already initialized, call Engine::shutdown() first"));
        }

        Self::set_log_level(config.log_level);
        crate::engine_info!(SOURCE, "Engine initialized for '{}' ({} fps target)",
            config.app_name, config.target_framerate);
        *current = Some(config);
        Ok(())
    }

    /// Drop the stored configuration and restore the Trace log level.
    ///
    /// `initialize()` may be called again afterwards.
    pub fn shutdown() {
        let Ok(mut current) = CONFIG.write() else { return };
        if current.take().is_some() {
            crate::engine_info!(SOURCE, "Engine shut down");
            Self::set_log_level(LogSeverity::Trace);
        }
    }

    pub fn is_initialized() -> bool {
        CONFIG.read().map(|current| current.is_some()).unwrap_or(false)
    }

    /// Copy of the active configuration
    ///
    /// # Errors
    ///
    /// `InitializationFailed` if the engine is not initialized.
    pub fn config() -> Result<Config> {
        let current = CONFIG
            .read()
            .map_err(|_| engine_err!(SOURCE, "Engine configuration lock poisoned"))?;

        current.clone().ok_or_else(|| {
            engine_err!(SOURCE, InitializationFailed,
                "Engine not initialized, call Engine::initialize() first")
        })
    }

    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Ok(mut current) = CONFIG.write() {
            *current = None;
        }
        Self::set_log_level(LogSeverity::Trace);
    }

    // ===== LOGGING =====

    /// Install a custom logger
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut installed) = logger().write() {
            *installed = Box::new(logger_impl);
        }
    }

    /// Reinstall the `DefaultLogger`
    pub fn reset_logger() {
        if let Ok(mut installed) = logger().write() {
            *installed = Box::new(DefaultLogger);
        }
    }

    /// Drop every entry less severe than `level`
    pub fn set_log_level(level: LogSeverity) {
        LOG_LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn log_level() -> LogSeverity {
        LogSeverity::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
    }

    /// Log without location (engine_trace! to engine_warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None);
    }

    /// Log with a file:line location (engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some((file, line)));
    }

    fn dispatch(severity: LogSeverity, source: &str, message: String, location: Option<(&'static str, u32)>) {
        if severity < Self::log_level() {
            return;
        }
        let Ok(installed) = logger().read() else { return };
        installed.log(&LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: location.map(|(file, _)| file),
            line: location.map(|(_, line)| line),
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
