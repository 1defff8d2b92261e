// Command Builder
// Pure (Platform, Metric) -> Invocation mapping; no I/O

use crate::domain::{Invocation, Metric, Platform};
use thiserror::Error;

/// Program used on Linux (resolved through PATH)
pub const LINUX_WC: &str = "wc";

/// Fully-qualified program used on macOS
pub const MACOS_WC: &str = "/usr/bin/wc";

/// Shell used on Windows
pub const WINDOWS_SHELL: &str = "powershell.exe";

/// Locale variable set on POSIX invocations
pub const LOCALE_VAR: &str = "LC_ALL";

/// UTF-8 locale for `wc` on Linux; without it `-m` counts bytes under C/POSIX
pub const LINUX_LOCALE: &str = "C.UTF-8";

/// UTF-8 locale for `wc` on macOS
pub const MACOS_LOCALE: &str = "en_US.UTF-8";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no command mapping for platform {0}")]
    UnsupportedPlatform(Platform),
}

/// Build the exact invocation measuring `metric` of the file at `path`
///
/// POSIX platforms pass the path verbatim as the last argument and run
/// `wc` under a UTF-8 locale so `-m` counts characters. Windows embeds it
/// double-quoted in a one-line PowerShell expression so paths with spaces
/// survive.
///
/// # Errors
/// - BuildError::UnsupportedPlatform for `Platform::Unsupported`
pub fn build(platform: Platform, metric: Metric, path: &str) -> Result<Invocation, BuildError> {
    match platform {
        Platform::Linux => Ok(
            Invocation::new(LINUX_WC, [metric.posix_flag(), path]).with_env(LOCALE_VAR, LINUX_LOCALE),
        ),
        Platform::MacOs => Ok(
            Invocation::new(MACOS_WC, [metric.posix_flag(), path]).with_env(LOCALE_VAR, MACOS_LOCALE),
        ),
        Platform::Windows => Ok(Invocation::new(
            WINDOWS_SHELL,
            [
                "-NoProfile".to_string(),
                "-Command".to_string(),
                windows_expression(metric, path),
            ],
        )),
        Platform::Unsupported => Err(BuildError::UnsupportedPlatform(platform)),
    }
}

/// Line/word/character counts read content; byte count reads file length metadata
fn windows_expression(metric: Metric, path: &str) -> String {
    let quoted = format!("\"{}\"", path);
    match metric {
        Metric::LineCount => format!(
            "Get-Content -Path {} | Measure-Object -Line | Select-Object -ExpandProperty Lines",
            quoted
        ),
        Metric::WordCount => format!(
            "Get-Content -Path {} | Measure-Object -Word | Select-Object -ExpandProperty Words",
            quoted
        ),
        Metric::CharacterCount => format!(
            "Get-Content -Path {} | Measure-Object -Character | Select-Object -ExpandProperty Characters",
            quoted
        ),
        Metric::ByteCount => format!(
            "Get-Item -Path {} | Select-Object -ExpandProperty Length",
            quoted
        ),
    }
}
