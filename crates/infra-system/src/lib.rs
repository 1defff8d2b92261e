// Tally Infrastructure - Host Adapters
// Implements: ProcessRunner, PlatformProbe

pub mod platform_probe_impl;
pub mod process_runner_impl;

pub use platform_probe_impl::HostPlatformProbe;
pub use process_runner_impl::TokioProcessRunner;
