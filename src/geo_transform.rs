use std::ffi::c_double;
use std::mem::MaybeUninit;

use crate::errors::{GdalError, Result};

/// An affine transform.
///
/// A six-element array storing the coefficients of an [affine transform]
/// used in mapping coordinates between pixel/line `(P, L)` (raster) space,
/// and `(Xp,Yp)` (projection/[`crate::spatial_ref::SpatialRef`]) space.
///
/// # Interpretation
///
/// A `GeoTransform`'s components have the following meanings:
///
///   * `GeoTransform[0]`: x-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[1]`: W-E pixel resolution (pixel width).
///   * `GeoTransform[2]`: row rotation (typically zero).
///   * `GeoTransform[3]`: y-coordinate of the upper-left corner of the upper-left pixel.
///   * `GeoTransform[4]`: column rotation (typically zero).
///   * `GeoTransform[5]`: N-S pixel resolution (pixel height), negative value for a North-up image.
///
/// [affine transform]: https://en.wikipedia.org/wiki/Affine_transformation
pub type GeoTransform = [c_double; 6];

/// Compute a north-up [`GeoTransform`] that maps a `width` x `height` pixel grid
/// onto the bounds `west, south, east, north`.
///
/// ```
/// use gdal_verify::geo_transform::from_bounds;
/// let gt = from_bounds(0.0, 0.0, 1.0, 1.0, 10, 10).unwrap();
/// assert_eq!(gt, [0.0, 0.1, 0.0, 1.0, 0.0, -0.1]);
/// ```
pub fn from_bounds(
    west: f64,
    south: f64,
    east: f64,
    north: f64,
    width: usize,
    height: usize,
) -> Result<GeoTransform> {
    if width == 0 || height == 0 {
        return Err(GdalError::BadArgument(format!(
            "cannot map bounds onto a {width}x{height} grid"
        )));
    }
    Ok([
        west,
        (east - west) / width as f64,
        0.0,
        north,
        0.0,
        -(north - south) / height as f64,
    ])
}

/// Extension methods on [`GeoTransform`]
pub trait GeoTransformEx {
    /// Apply GeoTransform to x/y coordinate.
    ///
    /// Wraps [GDALApplyGeoTransform].
    ///
    /// [GDALApplyGeoTransform]: https://gdal.org/api/raster_c_api.html#_CPPv421GDALApplyGeoTransformPdddPdPd
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64);
}

impl GeoTransformEx for GeoTransform {
    fn apply(&self, pixel: f64, line: f64) -> (f64, f64) {
        let mut geo_x = MaybeUninit::<f64>::uninit();
        let mut geo_y = MaybeUninit::<f64>::uninit();
        unsafe {
            gdal_sys::GDALApplyGeoTransform(
                self.as_ptr() as *mut f64,
                pixel,
                line,
                geo_x.as_mut_ptr(),
                geo_y.as_mut_ptr(),
            );
            (geo_x.assume_init(), geo_y.assume_init())
        }
    }
}
