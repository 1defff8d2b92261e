// Platform probe implementation
// reason: sysinfo for a descriptive host summary in logs
use sysinfo::System;

use tally_core::port::PlatformProbe;

/// Host platform probe
///
/// The identifier is the compile-target OS name (`linux`, `macos`,
/// `windows`, ...), which `Platform::resolve` understands directly. Kernel
/// names such as "Darwin" would be misread by substring matching, so
/// sysinfo is only used for the description.
#[derive(Debug, Default, Clone)]
pub struct HostPlatformProbe;

impl HostPlatformProbe {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformProbe for HostPlatformProbe {
    fn identifier(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn description(&self) -> String {
        let os = System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string());
        match System::kernel_version() {
            Some(kernel) => format!("{} (kernel {}, {})", os, kernel, std::env::consts::ARCH),
            None => format!("{} ({})", os, std::env::consts::ARCH),
        }
    }
}
