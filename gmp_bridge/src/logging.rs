//! Optional log output for the bridge. The managed caller decides whether
//! it wants any; until then every `tracing` event is dropped.

use crate::errors::{BridgeError, BridgeStatus};
use once_cell::sync::OnceCell;
use strum::FromRepr;
use tracing::level_filters::LevelFilter;

/// Verbosity levels accepted by [`setup_logging`]. Anything above
/// `Trace` is treated as `Trace`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromRepr)]
#[repr(u32)]
pub enum LogVerbosity {
    /// Warnings and errors only.
    Warn = 0,
    /// Plus informational messages.
    Info = 1,
    /// Plus every issue and release.
    Debug = 2,
    /// Everything, including GMP string drops.
    Trace = 3,
}

impl LogVerbosity {
    /// Decode a raw verbosity from the FFI, clamping high values.
    pub fn from_ffi(verbosity: u32) -> Self {
        Self::from_repr(verbosity).unwrap_or(Self::Trace)
    }

    fn level_filter(self) -> LevelFilter {
        match self {
            LogVerbosity::Warn => LevelFilter::WARN,
            LogVerbosity::Info => LevelFilter::INFO,
            LogVerbosity::Debug => LevelFilter::DEBUG,
            LogVerbosity::Trace => LevelFilter::TRACE,
        }
    }
}

static INSTALLED: OnceCell<LogVerbosity> = OnceCell::new();

fn install(verbosity: LogVerbosity) -> Result<LogVerbosity, BridgeError> {
    let installed = *INSTALLED.get_or_try_init(|| {
        tracing_subscriber::fmt()
            .with_max_level(verbosity.level_filter())
            .with_writer(std::io::stderr)
            .try_init()
            .map(|_| verbosity)
            .map_err(|e| BridgeError::LoggingUnavailable(e.to_string()))
    })?;
    if installed != verbosity {
        tracing::info!(?installed, requested = ?verbosity, "Logging already set up; keeping the existing level");
    }
    Ok(installed)
}

/// Route the bridge's log output to stderr. Optional; without it the
/// bridge is silent. Calling it again is harmless.
///
/// Parameters:
/// - `verbosity`: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
///
/// Return values: 0 for success, -3 if another logger was already
/// installed in this process.
#[no_mangle]
pub extern "C" fn setup_logging(verbosity: u32) -> i32 {
    let result = install(LogVerbosity::from_ffi(verbosity));
    match &result {
        Ok(level) => tracing::info!(
            ?level,
            gmp = crate::version::gmp_version_str(),
            "GMP bridge logging ready"
        ),
        Err(e) => eprintln!("{e}"),
    }
    BridgeStatus::from_result(&result) as i32
}
