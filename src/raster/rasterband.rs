use std::ffi::{c_int, c_void};
use std::marker::PhantomData;

use gdal_sys::{CPLErr, GDALMajorObjectH, GDALRWFlag, GDALRasterBandH};

use crate::dataset::Dataset;
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::raster::{GDALDataType, GdalType};
use crate::utils::_last_cpl_err;

#[cfg(feature = "ndarray")]
use ndarray::Array2;

/// Represents a single band of a dataset.
///
/// This object carries the lifetime of the dataset that
/// contains it. This is necessary to prevent the dataset
/// from being dropped before the band.
pub struct RasterBand<'a> {
    c_rasterband: GDALRasterBandH,
    phantom: PhantomData<&'a Dataset>,
}

fn window_arg(value: usize, what: &str) -> Result<c_int> {
    c_int::try_from(value)
        .map_err(|_| GdalError::BadArgument(format!("{what} {value} out of range")))
}

impl<'a> RasterBand<'a> {
    /// Create a RasterBand from a wrapped C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_rasterband(_: &'a Dataset, c_rasterband: GDALRasterBandH) -> Self {
        RasterBand {
            c_rasterband,
            phantom: PhantomData,
        }
    }

    /// Get x-size of the band
    pub fn x_size(&self) -> usize {
        let out = unsafe { gdal_sys::GDALGetRasterBandXSize(self.c_rasterband) };
        out as usize
    }

    /// Get y-size of the band
    pub fn y_size(&self) -> usize {
        let out = unsafe { gdal_sys::GDALGetRasterBandYSize(self.c_rasterband) };
        out as usize
    }

    /// Get dimensions of the band as `(cols, rows)`.
    pub fn size(&self) -> (usize, usize) {
        (self.x_size(), self.y_size())
    }

    pub fn band_type(&self) -> GDALDataType::Type {
        unsafe { gdal_sys::GDALGetRasterDataType(self.c_rasterband) }
    }

    /// Read data from this band into a slice. T implements 'GdalType'
    ///
    /// # Arguments
    /// * window - the window position from top left, `(col, row)`
    /// * window_size - the window size (GDAL will interpolate data if window_size != buffer_size)
    /// * size - the desired size to read
    /// * buffer - a slice to hold the data (length must equal product of size parameter)
    pub fn read_into_slice<T: Copy + GdalType>(
        &self,
        window: (usize, usize),
        window_size: (usize, usize),
        size: (usize, usize),
        buffer: &mut [T],
    ) -> Result<()> {
        let pixels = size.0 * size.1;
        if buffer.len() != pixels {
            return Err(GdalError::BadArgument(format!(
                "buffer of length {} cannot hold {}x{} pixels",
                buffer.len(),
                size.0,
                size.1
            )));
        }

        let rv = unsafe {
            gdal_sys::GDALRasterIO(
                self.c_rasterband,
                GDALRWFlag::GF_Read,
                window_arg(window.0, "window column")?,
                window_arg(window.1, "window row")?,
                window_arg(window_size.0, "window width")?,
                window_arg(window_size.1, "window height")?,
                buffer.as_mut_ptr() as *mut c_void,
                window_arg(size.0, "buffer width")?,
                window_arg(size.1, "buffer height")?,
                T::gdal_type(),
                0,
                0,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }

        Ok(())
    }

    /// Read a 'Buffer<T>' from this band. T implements 'GdalType'
    ///
    /// # Arguments
    /// * window - the window position from top left, `(col, row)`
    /// * window_size - the window size (GDAL will interpolate data if window_size != buffer_size)
    /// * size - the desired size of the 'Buffer'
    pub fn read_as<T: Copy + GdalType + Default>(
        &self,
        window: (usize, usize),
        window_size: (usize, usize),
        size: (usize, usize),
    ) -> Result<Buffer<T>> {
        let mut data = vec![T::default(); size.0 * size.1];
        self.read_into_slice(window, window_size, size, &mut data)?;
        Ok(Buffer { size, data })
    }

    /// Read the full band as a 'Buffer<T>'.
    pub fn read_band_as<T: Copy + GdalType + Default>(&self) -> Result<Buffer<T>> {
        let size = self.size();
        self.read_as::<T>((0, 0), size, size)
    }

    /// Read the single pixel at `row`, `col`.
    pub fn read_pixel<T: Copy + GdalType + Default>(&self, row: usize, col: usize) -> Result<T> {
        let mut value = [T::default()];
        self.read_into_slice((col, row), (1, 1), (1, 1), &mut value)?;
        Ok(value[0])
    }

    #[cfg(feature = "ndarray")]
    /// Read the full band as an 'Array2<T>'.
    ///
    /// The matrix shape is (rows, cols) and raster shape is (cols in x-axis, rows in y-axis).
    pub fn read_as_array<T: Copy + GdalType + Default>(&self) -> Result<Array2<T>> {
        let data = self.read_band_as::<T>()?;
        Ok(Array2::from_shape_vec((data.size.1, data.size.0), data.data)?)
    }

    /// Write a 'Buffer<T>' into this band.
    ///
    /// # Arguments
    /// * window - the window position from top left, `(col, row)`
    /// * window_size - the window size (GDAL will interpolate data if window_size != Buffer.size)
    pub fn write<T: GdalType + Copy>(
        &mut self,
        window: (usize, usize),
        window_size: (usize, usize),
        buffer: &Buffer<T>,
    ) -> Result<()> {
        if buffer.data.len() != buffer.size.0 * buffer.size.1 {
            return Err(GdalError::BadArgument(format!(
                "buffer of length {} does not match size {:?}",
                buffer.data.len(),
                buffer.size
            )));
        }
        let rv = unsafe {
            gdal_sys::GDALRasterIO(
                self.c_rasterband,
                GDALRWFlag::GF_Write,
                window_arg(window.0, "window column")?,
                window_arg(window.1, "window row")?,
                window_arg(window_size.0, "window width")?,
                window_arg(window_size.1, "window height")?,
                buffer.data.as_ptr() as *mut c_void,
                window_arg(buffer.size.0, "buffer width")?,
                window_arg(buffer.size.1, "buffer height")?,
                T::gdal_type(),
                0,
                0,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }
}

impl MajorObject for RasterBand<'_> {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_rasterband
    }
}

impl Metadata for RasterBand<'_> {}

/// A 2-D array backed by its `size` (cols, rows) and a row-major `Vec<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<T> {
    pub size: (usize, usize),
    pub data: Vec<T>,
}

impl<T: GdalType> Buffer<T> {
    /// Construct a new buffer from `size` (`(cols, rows)`) and `Vec<T>`.
    ///
    /// Fails if `size.0 * size.1 != data.len()`.
    pub fn new(size: (usize, usize), data: Vec<T>) -> Result<Self> {
        if size.0 * size.1 != data.len() {
            return Err(GdalError::BadArgument(format!(
                "size {:?} does not match length {}",
                size,
                data.len()
            )));
        }
        Ok(Buffer { size, data })
    }
}

pub type ByteBuffer = Buffer<u8>;
