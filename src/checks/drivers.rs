use std::collections::BTreeSet;

use crate::checks::Check;
use crate::transcript::Transcript;
use crate::DriverManager;

/// Drivers a usable build must register.
pub const REQUIRED_DRIVERS: [&str; 6] = ["GTiff", "HDF5", "netCDF", "PNG", "JPEG", "GeoJSON"];

/// Drivers that are reported when present but never fail the check.
pub const OPTIONAL_DRIVERS: [&str; 2] = ["GPKG", "JP2OpenJPEG"];

/// Outcome of comparing the registered drivers against the expected sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub missing: BTreeSet<String>,
    pub present_optional: BTreeSet<String>,
    pub missing_optional: BTreeSet<String>,
}

impl DriverReport {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Verifies the driver registry against required and optional driver names.
///
/// Names are GDAL driver short names and compare case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInventory {
    required: BTreeSet<String>,
    optional: BTreeSet<String>,
}

impl Default for DriverInventory {
    fn default() -> Self {
        Self::new(REQUIRED_DRIVERS, OPTIONAL_DRIVERS)
    }
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl DriverInventory {
    pub fn new<R, O>(required: R, optional: O) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        DriverInventory {
            required: required.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    pub fn optional(&self) -> &BTreeSet<String> {
        &self.optional
    }

    pub fn evaluate(&self, available: &BTreeSet<String>) -> DriverReport {
        DriverReport {
            missing: self.required.difference(available).cloned().collect(),
            present_optional: self.optional.intersection(available).cloned().collect(),
            missing_optional: self.optional.difference(available).cloned().collect(),
        }
    }

    /// Evaluate `available` and print the result.
    pub fn check_available(&self, available: &BTreeSet<String>, out: &mut Transcript<'_>) -> bool {
        let report = self.evaluate(available);

        if !report.passed() {
            out.fail(format_args!("Missing required drivers: {}", join(&report.missing)));
            return false;
        }

        out.pass("All required drivers present");
        for driver in &self.required {
            out.item(driver);
        }

        if !report.present_optional.is_empty() {
            out.blank();
            out.pass("Optional drivers present:");
            for driver in &report.present_optional {
                out.item(driver);
            }
        }

        if !report.missing_optional.is_empty() {
            out.blank();
            out.detail(format_args!(
                "Missing optional drivers: {}",
                join(&report.missing_optional)
            ));
        }

        true
    }
}

impl Check for DriverInventory {
    fn title(&self) -> &str {
        "Verify GDAL drivers"
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        let registry = match DriverManager::extensions() {
            Ok(registry) => registry,
            Err(e) => {
                out.fail_with_trace("Failed to check drivers", &e.into());
                return Ok(false);
            }
        };
        log::debug!("{} drivers registered", registry.len());

        let available: BTreeSet<String> = registry.into_keys().collect();
        Ok(self.check_available(&available, out))
    }
}
