//! Platform detection
//!
//! Reports OS and architecture using the kernel naming convention
//! (`darwin`, `linux`, `windows`). The value is computed once and cached.

use serde::Serialize;
use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use mirra_core::platform::CURRENT_PLATFORM;
///
/// assert!(!CURRENT_PLATFORM.os.is_empty());
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
    /// OS family: "unix", "windows"
    pub family: &'static str,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
}

impl Platform {
    /// Detect the platform the binary is running on
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            family: std::env::consts::FAMILY,
            arch: std::env::consts::ARCH,
        }
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }
}
