use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context};

use crate::checks::Check;
use crate::geo_transform::from_bounds;
use crate::raster::{ByteBuffer, RasterBand};
use crate::spatial_ref::SpatialRef;
use crate::transcript::Transcript;
use crate::vsi::MemFile;
use crate::{DriverCapabilities, DriverManager};

/// Backing store of the round trip, inside GDAL's in-memory filesystem.
pub const ROUNDTRIP_PATH: &str = "/vsimem/gdal-verify/roundtrip.tif";

/// `(row, col)` of the pixel read back after writing.
const PROBE: (usize, usize) = (0, 5);

#[cfg(feature = "ndarray")]
fn read_probe(band: &RasterBand<'_>) -> anyhow::Result<u8> {
    let block = band.read_as_array::<u8>()?;
    block
        .get([PROBE.0, PROBE.1])
        .copied()
        .ok_or_else(|| anyhow!("pixel {PROBE:?} outside {:?} block", block.dim()))
}

#[cfg(not(feature = "ndarray"))]
fn read_probe(band: &RasterBand<'_>) -> anyhow::Result<u8> {
    Ok(band.read_pixel::<u8>(PROBE.0, PROBE.1)?)
}

/// Stage at which [`RoundTrip::with_fault`] makes the round trip fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPoint {
    /// Dataset created and georeferenced, nothing written.
    AfterCreate,
    /// Pixels written, nothing read back.
    AfterWrite,
}

/// What was read back from the in-memory dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    /// `(rows, cols)`
    pub shape: (usize, usize),
    pub crs: String,
    pub driver: String,
    pub probe: u8,
}

/// Create a georeferenced single band `u8` raster in memory, write a known
/// block and read it back.
#[derive(Debug, Clone)]
pub struct RoundTrip {
    path: PathBuf,
    driver: String,
    width: usize,
    height: usize,
    epsg: u32,
    /// `(west, south, east, north)`
    bounds: (f64, f64, f64, f64),
    fault: Option<FaultPoint>,
}

impl Default for RoundTrip {
    fn default() -> Self {
        RoundTrip {
            path: PathBuf::from(ROUNDTRIP_PATH),
            driver: "GTiff".to_string(),
            width: 10,
            height: 10,
            epsg: 4326,
            bounds: (0.0, 0.0, 1.0, 1.0),
            fault: None,
        }
    }
}

impl RoundTrip {
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().into();
        self
    }

    /// Fail deliberately at `fault`, after the store and dataset are acquired.
    pub fn with_fault(mut self, fault: FaultPoint) -> Self {
        self.fault = Some(fault);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Values `0, 1, 2, ...` in row-major order, wrapping at 256.
    pub fn synthetic_block(&self) -> crate::errors::Result<ByteBuffer> {
        let data = (0..self.width * self.height).map(|i| i as u8).collect();
        ByteBuffer::new((self.width, self.height), data)
    }

    /// The report a correct library produces for this plan.
    pub fn expected(&self) -> RoundTripReport {
        RoundTripReport {
            shape: (self.height, self.width),
            crs: format!("EPSG:{}", self.epsg),
            driver: self.driver.clone(),
            probe: (PROBE.0 * self.width + PROBE.1) as u8,
        }
    }

    fn inject(&self, stage: FaultPoint) -> anyhow::Result<()> {
        match self.fault {
            Some(fault) if fault == stage => Err(anyhow!("injected fault {stage:?}")),
            _ => Ok(()),
        }
    }

    /// Run the round trip. The dataset is closed, then the store unlinked,
    /// before this returns on every path.
    pub fn execute(&self) -> anyhow::Result<RoundTripReport> {
        let driver = DriverManager::get_driver_by_name(&self.driver)
            .with_context(|| format!("looking up driver {}", self.driver))?;
        let capabilities = driver.capabilities()?;
        ensure!(
            capabilities.contains(DriverCapabilities::CREATE | DriverCapabilities::VIRTUALIO),
            "driver {} cannot create datasets in memory ({capabilities:?})",
            self.driver
        );

        let store = MemFile::reserve(&self.path)?;
        let mut dataset = store
            .create_raster::<u8>(&driver, self.width, self.height, 1)
            .context("creating dataset")?;

        let srs = SpatialRef::from_epsg(self.epsg)?;
        dataset.set_spatial_ref(&srs).context("setting CRS")?;
        let (west, south, east, north) = self.bounds;
        let transform = from_bounds(west, south, east, north, self.width, self.height)?;
        dataset
            .set_geo_transform(&transform)
            .context("setting geotransform")?;
        self.inject(FaultPoint::AfterCreate)?;

        let mut band = dataset.rasterband(1)?;
        let block = self.synthetic_block()?;
        band.write((0, 0), (self.width, self.height), &block).context("writing band 1")?;
        self.inject(FaultPoint::AfterWrite)?;

        let probe = read_probe(&band).context("reading band 1")?;
        let crs = dataset.spatial_ref()?.authority()?;

        Ok(RoundTripReport {
            shape: dataset.shape(),
            crs,
            driver: dataset.driver().short_name(),
            probe,
        })
    }

    /// One line per field of `actual` that differs from the plan.
    pub fn mismatches(&self, actual: &RoundTripReport) -> Vec<String> {
        let expected = self.expected();
        let mut mismatches = Vec::new();
        if actual.shape != expected.shape {
            mismatches.push(format!("Shape {:?}, expected {:?}", actual.shape, expected.shape));
        }
        if actual.crs != expected.crs {
            mismatches.push(format!("CRS {}, expected {}", actual.crs, expected.crs));
        }
        if actual.driver != expected.driver {
            mismatches.push(format!("Driver {}, expected {}", actual.driver, expected.driver));
        }
        if actual.probe != expected.probe {
            mismatches.push(format!(
                "Pixel {:?} is {}, expected {}",
                PROBE, actual.probe, expected.probe
            ));
        }
        mismatches
    }
}

impl Check for RoundTrip {
    fn title(&self) -> &str {
        "Round-trip in-memory raster"
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        let report = match self.execute() {
            Ok(report) => report,
            Err(e) => {
                out.fail_with_trace("Failed in-memory raster round trip", &e);
                return Ok(false);
            }
        };

        out.pass("Created in-memory raster");
        out.detail(format_args!("Shape: {:?}", report.shape));
        out.detail(format_args!("CRS: {}", report.crs));
        out.detail(format_args!("Driver: {}", report.driver));
        out.detail(format_args!("Pixel {PROBE:?}: {}", report.probe));

        let mismatches = self.mismatches(&report);
        if !mismatches.is_empty() {
            for mismatch in mismatches {
                out.fail(mismatch);
            }
            return Ok(false);
        }

        out.pass("Basic raster operations successful");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vsi::path_exists;

    fn run(check: &RoundTrip) -> (bool, String) {
        let mut buf = Vec::new();
        let passed = check.run(&mut Transcript::new(&mut buf)).unwrap();
        (passed, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_written_pixel_reads_back() {
        let check = RoundTrip::default().with_path("/vsimem/gdal-verify-tests/probe.tif");
        let report = check.execute().unwrap();
        assert_eq!(report.probe, 5);
        assert_eq!(report, check.expected());
        assert!(check.mismatches(&report).is_empty());
    }

    #[test]
    fn test_synthetic_block() {
        let block = RoundTrip::default().synthetic_block().unwrap();
        assert_eq!(block.size, (10, 10));
        assert_eq!(block.data[0], 0);
        assert_eq!(block.data[5], 5);
        assert_eq!(block.data[99], 99);
    }

    #[test]
    fn test_passes_and_releases_store() {
        let check = RoundTrip::default().with_path("/vsimem/gdal-verify-tests/passes.tif");
        let (passed, text) = run(&check);
        assert!(passed, "{text}");
        assert!(text.contains("  Shape: (10, 10)\n  CRS: EPSG:4326\n  Driver: GTiff\n"));
        assert!(!path_exists(check.path()).unwrap());

        // a second identical run can claim the same store
        let (passed, text) = run(&check);
        assert!(passed, "{text}");
    }

    #[test]
    fn test_injected_faults_release_store() {
        let path = "/vsimem/gdal-verify-tests/fault.tif";
        for fault in [FaultPoint::AfterCreate, FaultPoint::AfterWrite] {
            let faulty = RoundTrip::default().with_path(path).with_fault(fault);
            let (passed, text) = run(&faulty);
            assert!(!passed);
            assert!(text.starts_with("✗ Failed in-memory raster round trip: injected fault"));
            assert!(!path_exists(path).unwrap());

            let (passed, text) = run(&RoundTrip::default().with_path(path));
            assert!(passed, "{text}");
        }
    }

    #[test]
    fn test_leaked_store_fails_check() {
        let path = "/vsimem/gdal-verify-tests/leaked.tif";
        let held = MemFile::reserve(path).unwrap();
        let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
        drop(held.create_raster::<u8>(&driver, 1, 1, 1).unwrap());

        let (passed, text) = run(&RoundTrip::default().with_path(path));
        assert!(!passed);
        assert!(text.contains("already exists"));

        drop(held);
        assert!(run(&RoundTrip::default().with_path(path)).0);
    }

    #[test]
    fn test_mismatch_fails() {
        let check = RoundTrip::default();
        let mut report = check.expected();
        report.crs = "EPSG:3857".to_string();
        report.probe = 6;
        assert_eq!(
            check.mismatches(&report),
            vec![
                "CRS EPSG:3857, expected EPSG:4326".to_string(),
                "Pixel (0, 5) is 6, expected 5".to_string(),
            ]
        );
    }
}
