//! GDAL Configuration Functions
//!
//! The GDAL library can be configured at runtime using environment variables or
//! by using functions in this module. Options set by calling functions in this
//! module override options set in environment variables.
//!
//! ```no_run
//! use gdal_verify::config::*;
//!
//! // Point GDAL at a bundled data directory
//! set_config_option("GDAL_DATA", "/opt/gdal/share/gdal").unwrap();
//! assert_eq!(get_config_option("GDAL_DATA", "").unwrap(), "/opt/gdal/share/gdal");
//!
//! clear_config_option("GDAL_DATA").unwrap();
//! ```
//!
//! Refer to [GDAL `ConfigOptions`](https://gdal.org/user/configoptions.html) for
//! a full list of options.

use std::ffi::{c_char, CString};

use gdal_sys::{CPLErr, CPLErrorNum};

use crate::errors::{CplErrType, Result};
use crate::utils::_string;

/// Set a GDAL library configuration option
pub fn set_config_option(key: &str, value: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    let c_val = CString::new(value.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), c_val.as_ptr());
    };
    Ok(())
}

/// Get the value of a GDAL library configuration option
///
/// If the config option specified by `key` is not found, the value passed in the `default` paramter is returned.
pub fn get_config_option(key: &str, default: &str) -> Result<String> {
    let c_key = CString::new(key.as_bytes())?;
    let c_default = CString::new(default.as_bytes())?;
    let rv = unsafe { gdal_sys::CPLGetConfigOption(c_key.as_ptr(), c_default.as_ptr()) };
    Ok(_string(rv).unwrap_or_else(|| default.to_string()))
}

/// Clear the value of a GDAL library configuration option
pub fn clear_config_option(key: &str) -> Result<()> {
    let c_key = CString::new(key.as_bytes())?;
    unsafe {
        gdal_sys::CPLSetConfigOption(c_key.as_ptr(), ::std::ptr::null());
    };
    Ok(())
}

unsafe extern "C" fn log_error_handler(
    error_type: CPLErr::Type,
    error_num: CPLErrorNum,
    error_msg_ptr: *const c_char,
) {
    let error_msg = _string(error_msg_ptr).unwrap_or_default();

    match CplErrType::from(error_type) {
        CplErrType::None => {}
        CplErrType::Debug => log::debug!(target: "gdal", "{error_msg}"),
        CplErrType::Warning => log::warn!(target: "gdal", "[{error_num}] {error_msg}"),
        CplErrType::Failure | CplErrType::Fatal => {
            log::error!(target: "gdal", "[{error_num}] {error_msg}")
        }
    }
}

/// Forward GDAL's CPL diagnostics into the [`log`] facade under the `gdal` target.
///
/// Replaces GDAL's default handler, which prints to stderr. The last error
/// message stays available to [`crate::errors::GdalError`] construction.
pub fn route_errors_to_log() {
    unsafe {
        gdal_sys::CPLSetErrorHandler(Some(log_error_handler));
    }
}

/// Restore GDAL's default stderr error handler.
pub fn remove_error_handler() {
    unsafe {
        gdal_sys::CPLSetErrorHandler(None);
    }
}
