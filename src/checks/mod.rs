//! The verification checks.
//!
//! Each check prints its own transcript section and reports `Ok(true)` on
//! success. Failures the check anticipates (library errors, unexpected values)
//! are printed and reported as `Ok(false)`; an `Err` is reserved for defects in
//! the check itself and is handled by [`crate::suite::Suite`].

mod crs;
mod drivers;
mod import;
mod roundtrip;
mod versions;

pub use crs::{CrsCheck, DATUM_MARKER, LONGLAT_MARKER};
pub use drivers::{DriverInventory, DriverReport, OPTIONAL_DRIVERS, REQUIRED_DRIVERS};
pub use import::ImportCheck;
pub use roundtrip::{FaultPoint, RoundTrip, RoundTripReport, ROUNDTRIP_PATH};
pub use versions::VersionCheck;

use crate::transcript::Transcript;

pub trait Check {
    /// Shown in the section heading and the summary.
    fn title(&self) -> &str;

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool>;
}

/// The five checks in the order they run.
pub fn standard() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(ImportCheck),
        Box::new(VersionCheck),
        Box::new(DriverInventory::default()),
        Box::new(RoundTrip::default()),
        Box::new(CrsCheck::default()),
    ]
}
