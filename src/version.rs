//! GDAL Version Inspection Utilities
//!
//! ## Example
//!
//! Get the same string provided by using `--version` with the various GDAL CLI tools,
//! use [`VersionInfo::VERSION_SUMMARY`]:
//!
//! ```rust, no_run
//! use gdal_verify::version::VersionInfo;
//! let gdal_ver = VersionInfo::VERSION_SUMMARY.value().unwrap();
//! println!("{gdal_ver}")
//! ```
//! ```text,
//! GDAL 3.8.4, released 2024/02/08
//! ```

use std::collections::BTreeMap;
use std::ffi::CString;

use crate::errors::Result;
use crate::utils::{_last_null_pointer_err, _string};

/// Calls `GDALVersionInfo`, expecting `key` as one of the following values:
///
/// “VERSION_NUM”, “RELEASE_DATE”, “RELEASE_NAME”, "-–version”, “LICENSE”, “BUILD_INFO”.
///
/// Details: [`const char *GDALVersionInfo(const char*)`](https://gdal.org/api/raster_c_api.html#_CPPv415GDALVersionInfoPKc)
pub fn version_info(key: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    _string(unsafe { gdal_sys::GDALVersionInfo(c_key.as_ptr()) })
        .ok_or_else(|| _last_null_pointer_err("GDALVersionInfo"))
}

/// Convenience selector for the GDAL version properties the verifier reports.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VersionInfo {
    /// One line version message, i.e. “GDAL 1.1.7, released 2002/04/16”
    VERSION_SUMMARY,
    /// GDAL_VERSION_NUM formatted as a string, i.e. “1170”
    VERSION_NUM,
    /// GDAL_RELEASE_DATE formatted as a string, i.e. “20020416"
    RELEASE_DATE,
    /// GDAL_RELEASE_NAME, i.e. “1.1.7”
    RELEASE_NAME,
    /// `NAME=VALUE` pairs separated by newlines describing build time options.
    BUILD_INFO,
}

impl VersionInfo {
    fn gdal_key(&self) -> &'static str {
        match self {
            VersionInfo::VERSION_SUMMARY => "--version",
            VersionInfo::VERSION_NUM => "VERSION_NUM",
            VersionInfo::RELEASE_DATE => "RELEASE_DATE",
            VersionInfo::RELEASE_NAME => "RELEASE_NAME",
            VersionInfo::BUILD_INFO => "BUILD_INFO",
        }
    }

    /// Fetch the value from GDAL.
    pub fn value(&self) -> Result<String> {
        version_info(self.gdal_key())
    }
}

/// Fetches `BUILD_INFO` and splits it into its `KEY=VALUE` pairs.
pub fn build_info() -> Result<BTreeMap<String, String>> {
    Ok(parse_build_info(&VersionInfo::BUILD_INFO.value()?))
}

/// Lines without a `=` are skipped.
pub fn parse_build_info(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|l| l.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

/// The PROJ version GDAL runs against, if its build info reports one.
///
/// Prefers `PROJ_RUNTIME_VERSION` over `PROJ_BUILD_VERSION`.
pub fn proj_version(build_info: &BTreeMap<String, String>) -> Option<&str> {
    ["PROJ_RUNTIME_VERSION", "PROJ_BUILD_VERSION"]
        .iter()
        .filter_map(|key| build_info.get(*key))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}
