use std::ffi::CString;
use std::ptr;

use crate::errors::Result;
use crate::gdal_major_object::MajorObject;
use crate::utils::_string;

/// Read access to the `NAME=VALUE` metadata GDAL attaches to major objects.
pub trait Metadata: MajorObject {
    /// Object description. For drivers this is the short name, for datasets the file name.
    fn description(&self) -> Option<String> {
        _string(unsafe { gdal_sys::GDALGetDescription(self.gdal_object_ptr()) })
    }

    /// Get the value of `key` in `domain`, or in the default domain when `domain` is empty.
    fn metadata_item(&self, key: &str, domain: &str) -> Result<Option<String>> {
        let c_key = CString::new(key)?;
        let c_domain = CString::new(domain)?;
        let d_ptr = if domain.is_empty() {
            ptr::null()
        } else {
            c_domain.as_ptr()
        };

        let c_res =
            unsafe { gdal_sys::GDALGetMetadataItem(self.gdal_object_ptr(), c_key.as_ptr(), d_ptr) };
        Ok(_string(c_res))
    }
}
