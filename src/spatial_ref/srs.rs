use std::ffi::{c_char, c_int, c_void, CString};
use std::ptr;

use gdal_sys::{OGRErr, OGRSpatialReferenceH};

use crate::errors::*;
use crate::utils::{_last_null_pointer_err, _string};

/// A OpenGIS Spatial Reference System definition.
///
/// Used in geo-locating raster and vector data, and
/// in reprojecting geometries between coordinate systems.
///
/// See [`OGRSpatialReference`](https://gdal.org/api/ogrspatialref.html#ogrspatialreference).
#[derive(Debug)]
pub struct SpatialRef(OGRSpatialReferenceH);

impl Drop for SpatialRef {
    fn drop(&mut self) {
        unsafe { gdal_sys::OSRRelease(self.0) };
        self.0 = ptr::null_mut();
    }
}

impl Clone for SpatialRef {
    fn clone(&self) -> SpatialRef {
        let n_obj = unsafe { gdal_sys::OSRClone(self.0) };
        SpatialRef(n_obj)
    }
}

impl PartialEq for SpatialRef {
    fn eq(&self, other: &SpatialRef) -> bool {
        unsafe { gdal_sys::OSRIsSame(self.0, other.0) == 1 }
    }
}

/// Takes ownership of a GDAL-allocated string and frees it.
fn _owned_string(c_str: *mut c_char) -> Option<String> {
    let value = _string(c_str);
    unsafe { gdal_sys::VSIFree(c_str as *mut c_void) };
    value
}

impl SpatialRef {
    pub fn new() -> Result<SpatialRef> {
        let c_obj = unsafe { gdal_sys::OSRNewSpatialReference(ptr::null()) };
        if c_obj.is_null() {
            return Err(_last_null_pointer_err("OSRNewSpatialReference"));
        }
        Ok(SpatialRef(c_obj))
    }

    /// Build from any definition `OSRSetFromUserInput` accepts: "EPSG:4326", WKT, PROJ strings.
    pub fn from_definition(definition: &str) -> Result<SpatialRef> {
        let c_definition = CString::new(definition)?;
        let srs = Self::new()?;
        let rv = unsafe { gdal_sys::OSRSetFromUserInput(srs.0, c_definition.as_ptr()) };
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRSetFromUserInput",
            });
        }
        Ok(srs)
    }

    pub fn from_epsg(epsg_code: u32) -> Result<SpatialRef> {
        let code = c_int::try_from(epsg_code)
            .map_err(|_| GdalError::BadArgument(format!("EPSG code {epsg_code} out of range")))?;
        let srs = Self::new()?;
        let rv = unsafe { gdal_sys::OSRImportFromEPSG(srs.0, code) };
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRImportFromEPSG",
            });
        }
        Ok(srs)
    }

    /// Clones the spatial reference behind `c_obj`, leaving the original to its owner.
    ///
    /// # Safety
    /// `c_obj` must be a valid `OGRSpatialReferenceH`.
    pub unsafe fn from_c_obj(c_obj: OGRSpatialReferenceH) -> Result<SpatialRef> {
        let mut_c_obj = gdal_sys::OSRClone(c_obj);
        if mut_c_obj.is_null() {
            Err(_last_null_pointer_err("OSRClone"))
        } else {
            Ok(SpatialRef(mut_c_obj))
        }
    }

    pub fn to_wkt(&self) -> Result<String> {
        let mut c_wkt = ptr::null_mut();
        let rv = unsafe { gdal_sys::OSRExportToWkt(self.0, &mut c_wkt) };
        let wkt = _owned_string(c_wkt);
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRExportToWkt",
            });
        }
        wkt.ok_or_else(|| _last_null_pointer_err("OSRExportToWkt"))
    }

    /// Export to the legacy PROJ.4 `+key=value` form.
    pub fn to_proj4(&self) -> Result<String> {
        let mut c_proj4str = ptr::null_mut();
        let rv = unsafe { gdal_sys::OSRExportToProj4(self.0, &mut c_proj4str) };
        let proj4 = _owned_string(c_proj4str);
        if rv != OGRErr::OGRERR_NONE {
            return Err(GdalError::OgrError {
                err: rv,
                method_name: "OSRExportToProj4",
            });
        }
        proj4.ok_or_else(|| _last_null_pointer_err("OSRExportToProj4"))
    }

    pub fn auth_name(&self) -> Result<String> {
        let c_ptr = unsafe { gdal_sys::OSRGetAuthorityName(self.0, ptr::null()) };
        _string(c_ptr).ok_or_else(|| _last_null_pointer_err("OSRGetAuthorityName"))
    }

    pub fn auth_code(&self) -> Result<i32> {
        let c_ptr = unsafe { gdal_sys::OSRGetAuthorityCode(self.0, ptr::null()) };
        let code = _string(c_ptr).ok_or_else(|| _last_null_pointer_err("OSRGetAuthorityCode"))?;
        code.parse::<i32>().map_err(|_| GdalError::OgrError {
            err: OGRErr::OGRERR_UNSUPPORTED_SRS,
            method_name: "OSRGetAuthorityCode",
        })
    }

    /// `"{auth_name}:{auth_code}"`, e.g. "EPSG:4326".
    pub fn authority(&self) -> Result<String> {
        let name = self.auth_name()?;
        let c_ptr = unsafe { gdal_sys::OSRGetAuthorityCode(self.0, ptr::null()) };
        let code = _string(c_ptr).ok_or_else(|| _last_null_pointer_err("OSRGetAuthorityCode"))?;
        Ok(format!("{name}:{code}"))
    }

    pub fn to_c_hsrs(&self) -> OGRSpatialReferenceH {
        self.0
    }
}
