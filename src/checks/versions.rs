use std::collections::BTreeMap;

use crate::checks::Check;
use crate::transcript::Transcript;
use crate::version::{build_info, proj_version, VersionInfo};

/// Reads the GDAL release (required) and the PROJ release (informational).
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionCheck;

impl VersionCheck {
    /// Render the versions and decide the outcome. A missing PROJ version never fails.
    pub fn report(
        &self,
        out: &mut Transcript<'_>,
        release_name: &str,
        version_num: &str,
        proj: Option<&str>,
    ) -> bool {
        if release_name.trim().is_empty() {
            out.fail("GDAL reported an empty release name");
            return false;
        }
        out.pass(format_args!("GDAL version: {release_name} ({version_num})"));

        match proj {
            Some(version) => out.pass(format_args!("PROJ version: {version}")),
            None => out.detail("PROJ version not reported by this GDAL build"),
        }
        true
    }
}

impl Check for VersionCheck {
    fn title(&self) -> &str {
        "Check GDAL and PROJ versions"
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        let versions = || -> crate::errors::Result<(String, String, BTreeMap<String, String>)> {
            Ok((
                VersionInfo::RELEASE_NAME.value()?,
                VersionInfo::VERSION_NUM.value()?,
                build_info()?,
            ))
        };

        match versions() {
            Ok((release_name, version_num, info)) => {
                log::debug!("GDAL build info: {info:?}");
                Ok(self.report(out, &release_name, &version_num, proj_version(&info)))
            }
            Err(e) => {
                out.fail(format_args!("Failed to get version info: {e}"));
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(release_name: &str, proj: Option<&str>) -> (bool, String) {
        let mut buf = Vec::new();
        let passed = VersionCheck.report(
            &mut Transcript::new(&mut buf),
            release_name,
            "3080400",
            proj,
        );
        (passed, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_both_versions() {
        let (passed, text) = report("3.8.4", Some("9.3.1"));
        assert!(passed);
        assert_eq!(text, "✓ GDAL version: 3.8.4 (3080400)\n✓ PROJ version: 9.3.1\n");
    }

    #[test]
    fn test_missing_proj_is_informational() {
        let (passed, text) = report("3.8.4", None);
        assert!(passed);
        assert!(text.contains("  PROJ version not reported"));
    }

    #[test]
    fn test_empty_release_fails() {
        let (passed, text) = report("  ", Some("9.3.1"));
        assert!(!passed);
        assert!(text.starts_with("✗ "));
    }

    #[test]
    fn test_linked_library() {
        let mut buf = Vec::new();
        assert!(VersionCheck.run(&mut Transcript::new(&mut buf)).unwrap());
    }
}
