//! Shared fixtures for the end-to-end tests
//!
//! Expected counts are computed in Rust, independently of the external tool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tally_core::application::MeasuringExecutor;
use tally_core::domain::{Metric, Platform};
use tally_core::port::{PlatformProbe, ProcessRunner};
use tally_infra_system::{HostPlatformProbe, TokioProcessRunner};

/// Three lines, six words, 34 characters, 35 bytes
pub const FIXTURE: &str = "héllo world\nfoo bar\nbaz quxxxxxxx\n";

/// Platform of the machine running the tests
pub fn host_platform() -> Platform {
    HostPlatformProbe::new().platform()
}

/// Executor wired to real child processes
pub fn real_executor() -> MeasuringExecutor {
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());
    MeasuringExecutor::new(runner)
}

/// Write `content` to `dir/name` and return the path
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

/// Count computed in-process, for comparison with the external tool
pub fn expected(content: &str, metric: Metric) -> u64 {
    let count = match metric {
        Metric::LineCount => content.matches('\n').count(),
        Metric::WordCount => content.split_whitespace().count(),
        Metric::CharacterCount => content.chars().count(),
        Metric::ByteCount => content.len(),
    };
    count as u64
}
