//! GDAL Raster Data

mod rasterband;
mod types;

pub use rasterband::{Buffer, ByteBuffer, RasterBand};
pub use types::{data_type_name, GDALDataType, GdalType};

#[cfg(test)]
mod tests;
