use std::collections::BTreeMap;
use std::ffi::{c_int, CString};
use std::path::Path;
use std::sync::Once;

use bitflags::bitflags;
use gdal_sys::{GDALDriverH, GDALMajorObjectH};

use crate::dataset::Dataset;
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::raster::GdalType;
use crate::utils::{_last_null_pointer_err, _path_to_c_string, _string};

static START: Once = Once::new();

pub fn _register_drivers() {
    START.call_once(DriverManager::register_all);
}

bitflags! {
    /// Capabilities a driver advertises through its `DCAP_*` metadata items.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DriverCapabilities: u32 {
        const RASTER = 0x01;
        const VECTOR = 0x02;
        const CREATE = 0x04;
        const CREATE_COPY = 0x08;
        const VIRTUALIO = 0x10;
    }
}

impl DriverCapabilities {
    const METADATA_KEYS: [(&'static str, DriverCapabilities); 5] = [
        ("DCAP_RASTER", DriverCapabilities::RASTER),
        ("DCAP_VECTOR", DriverCapabilities::VECTOR),
        ("DCAP_CREATE", DriverCapabilities::CREATE),
        ("DCAP_CREATECOPY", DriverCapabilities::CREATE_COPY),
        ("DCAP_VIRTUALIO", DriverCapabilities::VIRTUALIO),
    ];
}

/// Raster and Vector Driver API
///
/// One of GDAL's major strengths is the vast number of data formats it's able to work with.
/// The GDAL Manual has a full list of available [raster](https://gdal.org/drivers/raster/index.html)
/// and [vector](https://gdal.org/drivers/vector/index.html) drivers.
///
/// Drivers are owned by GDAL's driver manager and are never released by Rust.
#[derive(Debug)]
pub struct Driver {
    c_driver: GDALDriverH,
}

impl Driver {
    /// Creates a new Driver object by wrapping a C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_driver(c_driver: GDALDriverH) -> Driver {
        Driver { c_driver }
    }

    /// Return the short name of a driver, e.g. "GTiff".
    pub fn short_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverShortName(self.c_driver) };
        _string(rv).unwrap_or_default()
    }

    /// Return the long name of a driver, e.g. "GeoTIFF".
    pub fn long_name(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetDriverLongName(self.c_driver) };
        _string(rv).unwrap_or_default()
    }

    /// File extensions the driver declares in `DMD_EXTENSIONS` (or the older `DMD_EXTENSION`).
    pub fn extensions(&self) -> Result<Vec<String>> {
        let declared = match self.metadata_item("DMD_EXTENSIONS", "")? {
            Some(list) => Some(list),
            None => self.metadata_item("DMD_EXTENSION", "")?,
        };
        Ok(declared
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    pub fn capabilities(&self) -> Result<DriverCapabilities> {
        let mut caps = DriverCapabilities::empty();
        for (key, flag) in DriverCapabilities::METADATA_KEYS {
            if self.metadata_item(key, "")?.as_deref() == Some("YES") {
                caps |= flag;
            }
        }
        Ok(caps)
    }

    /// Create a new dataset of size (`size_x`, `size_y`) and `bands` band count,
    /// with `T` as the band type.
    pub fn create_with_band_type<T: GdalType, P: AsRef<Path>>(
        &self,
        filename: P,
        size_x: usize,
        size_y: usize,
        bands: usize,
    ) -> Result<Dataset> {
        let c_filename = _path_to_c_string(filename.as_ref())?;
        let size_x = c_int::try_from(size_x)
            .map_err(|_| GdalError::BadArgument(format!("width {size_x} out of range")))?;
        let size_y = c_int::try_from(size_y)
            .map_err(|_| GdalError::BadArgument(format!("height {size_y} out of range")))?;
        let bands = c_int::try_from(bands)
            .map_err(|_| GdalError::BadArgument(format!("band count {bands} out of range")))?;

        let c_dataset = unsafe {
            gdal_sys::GDALCreate(
                self.c_driver,
                c_filename.as_ptr(),
                size_x,
                size_y,
                bands,
                T::gdal_type(),
                std::ptr::null_mut(),
            )
        };

        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreate"));
        };

        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }
}

impl MajorObject for Driver {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_driver
    }
}

impl Metadata for Driver {}

/// A wrapper around GDAL's driver registry.
pub struct DriverManager;

impl DriverManager {
    /// Returns the number of registered drivers.
    pub fn count() -> usize {
        _register_drivers();
        let count = unsafe { gdal_sys::GDALGetDriverCount() };
        count.max(0) as usize
    }

    /// Returns the driver at `index`.
    pub fn get_driver(index: usize) -> Result<Driver> {
        _register_drivers();
        let index = c_int::try_from(index)
            .map_err(|_| GdalError::BadArgument(format!("driver index {index} out of range")))?;
        let c_driver = unsafe { gdal_sys::GDALGetDriver(index) };
        if c_driver.is_null() {
            return Err(_last_null_pointer_err("GDALGetDriver"));
        }
        Ok(Driver { c_driver })
    }

    /// Get a driver by its short name, e.g. "GTiff".
    pub fn get_driver_by_name(name: &str) -> Result<Driver> {
        _register_drivers();
        let c_name = CString::new(name)?;
        let c_driver = unsafe { gdal_sys::GDALGetDriverByName(c_name.as_ptr()) };
        if c_driver.is_null() {
            return Err(_last_null_pointer_err("GDALGetDriverByName"));
        };
        Ok(Driver { c_driver })
    }

    /// Iterate over every registered driver.
    pub fn all() -> impl Iterator<Item = Result<Driver>> {
        (0..Self::count()).map(Self::get_driver)
    }

    /// Map every registered driver's short name to its declared file extensions.
    ///
    /// Drivers that declare no extension (e.g. network or in-memory formats) map to
    /// an empty list and are still present in the map.
    pub fn extensions() -> Result<BTreeMap<String, Vec<String>>> {
        let mut registry = BTreeMap::new();
        for driver in Self::all() {
            let driver = driver?;
            registry.insert(driver.short_name(), driver.extensions()?);
        }
        Ok(registry)
    }

    /// Register all known GDAL drivers.
    pub fn register_all() {
        unsafe {
            gdal_sys::GDALAllRegister();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_registry_has_gtiff() {
        let registry = DriverManager::extensions().unwrap();
        assert_eq!(registry.len(), DriverManager::count());
        let gtiff = &registry["GTiff"];
        assert!(gtiff.iter().any(|ext| ext == "tif"));
    }

    #[test]
    fn test_gtiff_capabilities() {
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        let caps = driver.capabilities().unwrap();
        assert!(caps.contains(DriverCapabilities::RASTER | DriverCapabilities::CREATE));
        assert!(caps.contains(DriverCapabilities::VIRTUALIO));
        assert_eq!(driver.description().as_deref(), Some("GTiff"));
    }

    #[test]
    fn test_unknown_driver_is_error() {
        let _quiet = crate::test_utils::SuppressGDALErrorLog::new();
        assert!(DriverManager::get_driver_by_name("NoSuchDriver").is_err());
    }
}
