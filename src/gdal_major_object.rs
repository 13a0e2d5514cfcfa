use gdal_sys::GDALMajorObjectH;

/// Common trait for GDAL objects that carry metadata: drivers and datasets.
pub trait MajorObject {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH;
}
