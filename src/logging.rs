//! Logging setup and driver-diagnostic routing
//!
//! Everything goes through the `log` facade. Driver diagnostics are filtered
//! by severity: medium and high severity land on the error stream, anything
//! else is informational.

use log::LevelFilter;

/// Initializes `env_logger`.
///
/// Defaults to `info` for this crate and `warn` for the wgpu stack; `RUST_LOG`
/// overrides both. Safe to call more than once.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("wgpu_core", LevelFilter::Warn)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .filter_module("naga", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Severity attached to a driver diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Notification,
    Low,
    Medium,
    High,
}

/// Where a diagnostic is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStream {
    Info,
    Error,
}

pub fn route(severity: DiagnosticSeverity) -> DiagnosticStream {
    match severity {
        DiagnosticSeverity::Medium | DiagnosticSeverity::High => DiagnosticStream::Error,
        DiagnosticSeverity::Notification | DiagnosticSeverity::Low => DiagnosticStream::Info,
    }
}

/// Maps an uncaptured wgpu error onto the diagnostic severity scale.
pub fn classify(error: &wgpu::Error) -> DiagnosticSeverity {
    match error {
        wgpu::Error::Validation { .. } => DiagnosticSeverity::Medium,
        _ => DiagnosticSeverity::High,
    }
}

/// Emits a diagnostic on the stream its severity routes to. Never blocks or
/// aborts.
pub fn report(severity: DiagnosticSeverity, message: &str) {
    match route(severity) {
        DiagnosticStream::Error => log::error!("GPU diagnostic ({:?}): {}", severity, message),
        DiagnosticStream::Info => log::info!("GPU diagnostic ({:?}): {}", severity, message),
    }
}

/// Installs the diagnostic listener on a device.
pub fn install_device_diagnostics(device: &wgpu::Device) {
    device.on_uncaptured_error(Box::new(|error| {
        report(classify(&error), &error.to_string());
    }));
}
