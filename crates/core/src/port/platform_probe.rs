// Platform detection port
// Supplies the identifier that Platform::resolve maps to a variant

use crate::domain::Platform;

/// Platform probe port (queried once per process)
pub trait PlatformProbe: Send + Sync {
    /// Opaque platform-identifying string (e.g. "linux", "Windows 11")
    fn identifier(&self) -> String;

    /// Human-readable host description for logs
    fn description(&self) -> String {
        self.identifier()
    }

    /// Resolve the identifier to a platform variant
    fn platform(&self) -> Platform {
        Platform::resolve(&self.identifier())
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Mock PlatformProbe returning a fixed identifier
    pub struct MockPlatformProbe {
        identifier: String,
    }
    impl MockPlatformProbe {
        pub fn new(identifier: impl Into<String>) -> Self {
            Self {
                identifier: identifier.into(),
            }
        }
    }
    impl PlatformProbe for MockPlatformProbe {
        fn identifier(&self) -> String {
            self.identifier.clone()
        }
    }
}
