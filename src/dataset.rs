use std::ffi::c_int;

use gdal_sys::{CPLErr, GDALDatasetH, GDALMajorObjectH};

use crate::errors::*;
use crate::geo_transform::GeoTransform;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::raster::RasterBand;
use crate::spatial_ref::SpatialRef;
use crate::utils::{_last_cpl_err, _last_null_pointer_err};
use crate::Driver;

/// Wrapper around a [`GDALDataset`][GDALDataset] object.
///
/// The dataset is closed (and, for drivers that buffer writes, flushed) when
/// this value is dropped.
///
/// [GDALDataset]: https://gdal.org/api/gdaldataset_cpp.html#_CPPv411GDALDataset
#[derive(Debug)]
pub struct Dataset {
    c_dataset: GDALDatasetH,
}

impl Dataset {
    /// Creates a new Dataset by wrapping a C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer. The returned value takes
    /// ownership and closes the handle on drop.
    pub unsafe fn from_c_dataset(c_dataset: GDALDatasetH) -> Dataset {
        Dataset { c_dataset }
    }

    /// Get the driver that created this dataset.
    pub fn driver(&self) -> Driver {
        unsafe {
            let c_driver = gdal_sys::GDALGetDatasetDriver(self.c_dataset);
            Driver::from_c_driver(c_driver)
        }
    }

    /// Fetch a band object for a dataset. Band indices start at 1.
    pub fn rasterband(&self, band_index: usize) -> Result<RasterBand> {
        let index = c_int::try_from(band_index)
            .map_err(|_| GdalError::BadArgument(format!("band index {band_index} out of range")))?;
        unsafe {
            let c_band = gdal_sys::GDALGetRasterBand(self.c_dataset, index);
            if c_band.is_null() {
                return Err(_last_null_pointer_err("GDALGetRasterBand"));
            }
            Ok(RasterBand::from_c_rasterband(self, c_band))
        }
    }

    pub fn raster_count(&self) -> usize {
        (unsafe { gdal_sys::GDALGetRasterCount(self.c_dataset) }).max(0) as usize
    }

    /// Returns `(width, height)` in pixels.
    pub fn raster_size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterXSize(self.c_dataset) } as usize;
        let size_y = unsafe { gdal_sys::GDALGetRasterYSize(self.c_dataset) } as usize;
        (size_x, size_y)
    }

    /// Returns `(rows, cols)`, the numpy-style shape of a single band.
    pub fn shape(&self) -> (usize, usize) {
        let (cols, rows) = self.raster_size();
        (rows, cols)
    }

    /// Get the spatial reference system for this dataset.
    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        let c_srs = unsafe { gdal_sys::GDALGetSpatialRef(self.c_dataset) };
        if c_srs.is_null() {
            return Err(_last_null_pointer_err("GDALGetSpatialRef"));
        }
        // The dataset owns `c_srs`, so keep a clone of our own.
        unsafe { SpatialRef::from_c_obj(c_srs) }
    }

    /// Set the spatial reference system for this dataset.
    pub fn set_spatial_ref(&mut self, spatial_ref: &SpatialRef) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALSetSpatialRef(self.c_dataset, spatial_ref.to_c_hsrs()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Set the [`GeoTransform`] of this dataset.
    pub fn set_geo_transform(&mut self, transformation: &GeoTransform) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALSetGeoTransform(self.c_dataset, transformation.as_ptr() as *mut f64)
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Get the [`GeoTransform`] of this dataset.
    ///
    /// Fails when the dataset has none.
    pub fn geo_transform(&self) -> Result<GeoTransform> {
        let mut transformation = GeoTransform::default();
        let rv =
            unsafe { gdal_sys::GDALGetGeoTransform(self.c_dataset, transformation.as_mut_ptr()) };

        // check if the dataset has a GeoTransform
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(transformation)
    }
}

impl MajorObject for Dataset {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_dataset
    }
}

impl Metadata for Dataset {}

impl Drop for Dataset {
    fn drop(&mut self) {
        log::trace!("closing dataset {:?}", self.description());
        unsafe {
            gdal_sys::GDALClose(self.c_dataset);
        }
    }
}
