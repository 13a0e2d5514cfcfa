//! GDAL's `/vsimem/` in-memory virtual filesystem.
//!
//! A [`MemFile`] reserves a path in `/vsimem/` for the duration of a scope and
//! removes whatever GDAL wrote there when it is dropped:
//!
//! ```no_run
//! use gdal_verify::vsi::MemFile;
//! use gdal_verify::DriverManager;
//!
//! # fn main() -> gdal_verify::errors::Result<()> {
//! let store = MemFile::reserve("/vsimem/scratch/out.tif")?;
//! let driver = DriverManager::get_driver_by_name("GTiff")?;
//! let dataset = store.create_raster::<u8>(&driver, 10, 10, 1)?;
//! // `dataset` is declared after `store`, so it is closed first.
//! # drop(dataset);
//! # Ok(())
//! # }
//! ```

use std::mem::MaybeUninit;
use std::path::{Path, PathBuf};

use crate::errors::{GdalError, Result};
use crate::raster::GdalType;
use crate::utils::_path_to_c_string;
use crate::{Dataset, Driver};

const VSIMEM_PREFIX: &str = "/vsimem/";

/// Returns whether anything exists at `path` in any GDAL virtual filesystem.
pub fn path_exists<P: AsRef<Path>>(path: P) -> Result<bool> {
    let c_path = _path_to_c_string(path.as_ref())?;
    let mut stat = MaybeUninit::<gdal_sys::VSIStatBufL>::zeroed();
    let rv = unsafe { gdal_sys::VSIStatL(c_path.as_ptr(), stat.as_mut_ptr()) };
    Ok(rv == 0)
}

/// Unlink a VSIMemFile.
pub fn unlink_mem_file<P: AsRef<Path>>(file_name: P) -> Result<()> {
    _unlink_mem_file(file_name.as_ref())
}

fn _unlink_mem_file(file_name: &Path) -> Result<()> {
    let file_name_c = _path_to_c_string(file_name)?;

    let rv = unsafe { gdal_sys::VSIUnlink(file_name_c.as_ptr()) };

    if rv != 0 {
        return Err(GdalError::UnlinkMemFile {
            file_name: file_name.display().to_string(),
        });
    }

    Ok(())
}

/// Exclusive claim on a `/vsimem/` path, unlinked on drop.
///
/// Datasets created on the path must be dropped before the `MemFile`.
/// Declaring the dataset after the `MemFile` in the same scope gives that
/// order, since locals drop in reverse.
#[derive(Debug)]
pub struct MemFile {
    path: PathBuf,
}

impl MemFile {
    /// Claim `path`, which must live under `/vsimem/` and must not exist yet.
    ///
    /// A path that already exists means an earlier store was never released,
    /// and fails with [`GdalError::MemFileInUse`].
    pub fn reserve<P: AsRef<Path>>(path: P) -> Result<MemFile> {
        let path = path.as_ref();
        if !path.to_string_lossy().starts_with(VSIMEM_PREFIX) {
            return Err(GdalError::BadArgument(format!(
                "'{}' is not a {VSIMEM_PREFIX} path",
                path.display()
            )));
        }
        if path_exists(path)? {
            return Err(GdalError::MemFileInUse {
                file_name: path.display().to_string(),
            });
        }
        log::debug!("reserved in-memory file {}", path.display());
        Ok(MemFile { path: path.into() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a `size_x` x `size_y` dataset with `bands` bands of type `T` backed by this file.
    pub fn create_raster<T: GdalType>(
        &self,
        driver: &Driver,
        size_x: usize,
        size_y: usize,
        bands: usize,
    ) -> Result<Dataset> {
        driver.create_with_band_type::<T, _>(&self.path, size_x, size_y, bands)
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        match path_exists(&self.path) {
            Ok(true) => {
                if let Err(e) = unlink_mem_file(&self.path) {
                    log::warn!("{e}");
                } else {
                    log::debug!("released in-memory file {}", self.path.display());
                }
            }
            // nothing was ever written
            Ok(false) => log::debug!("released unused in-memory file {}", self.path.display()),
            Err(e) => log::warn!("{e}"),
        }
    }
}
