//! Host and toolchain description printed before the checks.

use crate::transcript::Transcript;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub architecture: &'static str,
    pub platform: String,
    /// `rustc --version` of the toolchain that built this binary.
    pub toolchain: &'static str,
    /// `ndarray` version when the `array` feature is compiled in, `Some("unknown")`
    /// if it could not be resolved at build time.
    pub ndarray: Option<&'static str>,
}

#[cfg(feature = "ndarray")]
fn ndarray_version() -> Option<&'static str> {
    Some(option_env!("GDAL_VERIFY_NDARRAY_VERSION").unwrap_or("unknown"))
}

#[cfg(not(feature = "ndarray"))]
fn ndarray_version() -> Option<&'static str> {
    None
}

impl Environment {
    pub fn current() -> Self {
        use std::env::consts::{ARCH, FAMILY, OS};

        Environment {
            architecture: ARCH,
            platform: format!("{OS}-{ARCH}-{FAMILY}"),
            toolchain: env!("GDAL_VERIFY_RUSTC_SUMMARY"),
            ndarray: ndarray_version(),
        }
    }

    pub fn report(&self, out: &mut Transcript<'_>) {
        out.heading("System Information");
        out.detail(format_args!("Architecture: {}", self.architecture));
        out.detail(format_args!("Platform: {}", self.platform));
        out.detail(format_args!("Rust version: {}", self.toolchain));
        match self.ndarray {
            Some(version) => out.detail(format_args!("ndarray version: {version}")),
            None => out.detail("ndarray: not enabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report() {
        let env = Environment {
            architecture: "aarch64",
            platform: "macos-aarch64-unix".to_string(),
            toolchain: "rustc 1.80.0",
            ndarray: None,
        };
        let mut buf = Vec::new();
        env.report(&mut Transcript::new(&mut buf));
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with(
            "  Architecture: aarch64\n  Platform: macos-aarch64-unix\n  \
             Rust version: rustc 1.80.0\n  ndarray: not enabled\n"
        ));
    }

    #[test]
    fn test_report_ndarray_version() {
        let env = Environment {
            ndarray: Some("0.16.1"),
            ..Environment::current()
        };
        let mut buf = Vec::new();
        env.report(&mut Transcript::new(&mut buf));
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("  ndarray version: 0.16.1\n"));
    }

    #[test]
    fn test_current() {
        let env = Environment::current();
        assert_eq!(env.architecture, std::env::consts::ARCH);
        assert!(env.toolchain.starts_with("rustc"));
        assert_eq!(env.ndarray.is_some(), cfg!(feature = "ndarray"));
    }
}
