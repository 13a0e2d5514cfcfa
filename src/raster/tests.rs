use crate::errors::GdalError;
use crate::geo_transform::from_bounds;
use crate::raster::{data_type_name, Buffer, ByteBuffer};
use crate::spatial_ref::SpatialRef;
use crate::vsi::MemFile;
use crate::DriverManager;

#[test]
fn test_create_write_read() {
    let store = MemFile::reserve("/vsimem/gdal-verify-tests/raster-rw.tif").unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let dataset = store.create_raster::<u8>(&driver, 20, 10, 1).unwrap();
    assert_eq!(dataset.raster_size(), (20, 10));
    assert_eq!(dataset.shape(), (10, 20));
    assert_eq!(dataset.raster_count(), 1);

    let mut band = dataset.rasterband(1).unwrap();
    assert_eq!(band.size(), (20, 10));
    assert_eq!(data_type_name(band.band_type()).as_deref(), Some("Byte"));

    let data = (0..200).map(|v| v as u8).collect();
    let buffer = ByteBuffer::new((20, 10), data).unwrap();
    band.write((0, 0), (20, 10), &buffer).unwrap();

    let window = band.read_as::<u8>((3, 2), (2, 2), (2, 2)).unwrap();
    assert_eq!(window.data, vec![43, 44, 63, 64]);
    assert_eq!(band.read_pixel::<u8>(9, 19).unwrap(), 199);
    assert_eq!(band.read_band_as::<u8>().unwrap(), buffer);
}

#[test]
fn test_set_georeferencing() {
    let store = MemFile::reserve("/vsimem/gdal-verify-tests/raster-geo.tif").unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut dataset = store.create_raster::<f32>(&driver, 10, 10, 2).unwrap();

    let transform = from_bounds(0.0, 0.0, 1.0, 1.0, 10, 10).unwrap();
    dataset.set_geo_transform(&transform).unwrap();
    assert_eq!(dataset.geo_transform().unwrap(), transform);

    let srs = SpatialRef::from_epsg(4326).unwrap();
    dataset.set_spatial_ref(&srs).unwrap();
    assert_eq!(dataset.spatial_ref().unwrap().authority().unwrap(), "EPSG:4326");
    assert_eq!(dataset.driver().short_name(), "GTiff");
}

#[test]
fn test_buffer_size_mismatch() {
    assert!(matches!(
        Buffer::<u8>::new((10, 10), vec![0; 99]),
        Err(GdalError::BadArgument(_))
    ));
}

#[test]
fn test_read_into_wrong_sized_slice() {
    let store = MemFile::reserve("/vsimem/gdal-verify-tests/raster-slice.tif").unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let dataset = store.create_raster::<u8>(&driver, 4, 4, 1).unwrap();
    let band = dataset.rasterband(1).unwrap();
    let mut too_small = [0u8; 3];
    assert!(band
        .read_into_slice((0, 0), (2, 2), (2, 2), &mut too_small)
        .is_err());
}

#[test]
fn test_missing_band() {
    let _quiet = crate::test_utils::SuppressGDALErrorLog::new();
    let store = MemFile::reserve("/vsimem/gdal-verify-tests/raster-band.tif").unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let dataset = store.create_raster::<u8>(&driver, 4, 4, 1).unwrap();
    assert!(dataset.rasterband(2).is_err());
}

#[cfg(feature = "ndarray")]
#[test]
fn test_read_as_array() {
    use ndarray::arr2;

    let store = MemFile::reserve("/vsimem/gdal-verify-tests/raster-array.tif").unwrap();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let dataset = store.create_raster::<u8>(&driver, 3, 2, 1).unwrap();
    let mut band = dataset.rasterband(1).unwrap();
    let buffer = ByteBuffer::new((3, 2), vec![1, 2, 3, 4, 5, 6]).unwrap();
    band.write((0, 0), (3, 2), &buffer).unwrap();
    assert_eq!(
        band.read_as_array::<u8>().unwrap(),
        arr2(&[[1, 2, 3], [4, 5, 6]])
    );
}
