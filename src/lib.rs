//! Smoke tests for a prebuilt [GDAL](https://gdal.org/) library bundling PROJ.
//!
//! The `gdal-verify` binary runs five checks against the linked library and
//! exits with `0` only if all of them pass:
//!
//! 1. the bindings load and GDAL reports a version,
//! 2. the GDAL and PROJ release versions are readable,
//! 3. the required format drivers are registered,
//! 4. a GeoTIFF can be created, written and read back in `/vsimem/`,
//! 5. EPSG:4326 can be built and exported as a PROJ.4 string.
//!
//! ## Use
//!
//! ```no_run
//! use gdal_verify::suite::Suite;
//! use gdal_verify::transcript::Transcript;
//!
//! let mut stdout = std::io::stdout();
//! let summary = Suite::default().run(&mut Transcript::new(&mut stdout));
//! println!("{}/{}", summary.passed(), summary.total());
//! ```
//!
//! The modules below `checks` are a small safe layer over `gdal-sys`,
//! covering what the checks need.

pub mod checks;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod environment;
pub mod errors;
pub mod geo_transform;
mod gdal_major_object;
mod metadata;
pub mod raster;
pub mod spatial_ref;
pub mod suite;
pub mod transcript;
mod utils;
pub mod version;
pub mod vsi;

pub use dataset::Dataset;
pub use driver::{Driver, DriverCapabilities, DriverManager};
pub use gdal_major_object::MajorObject;
pub use metadata::Metadata;

#[cfg(test)]
mod test_utils;
