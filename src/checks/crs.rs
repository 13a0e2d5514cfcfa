use crate::checks::Check;
use crate::spatial_ref::SpatialRef;
use crate::transcript::Transcript;

/// Substring of a PROJ.4 definition for a geographic (longitude/latitude) CRS.
pub const LONGLAT_MARKER: &str = "+proj=longlat";
/// Substring of a PROJ.4 definition on the WGS84 datum.
pub const DATUM_MARKER: &str = "+datum=WGS84";

/// Build a CRS from an EPSG code and validate its PROJ.4 export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrsCheck {
    epsg: u32,
}

impl Default for CrsCheck {
    fn default() -> Self {
        CrsCheck { epsg: 4326 }
    }
}

impl CrsCheck {
    pub fn new(epsg: u32) -> Self {
        CrsCheck { epsg }
    }

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    pub fn is_wgs84_longlat(proj4: &str) -> bool {
        proj4.contains(LONGLAT_MARKER) && proj4.contains(DATUM_MARKER)
    }
}

impl Check for CrsCheck {
    fn title(&self) -> &str {
        "CRS operations"
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        let srs = match SpatialRef::from_epsg(self.epsg) {
            Ok(srs) => srs,
            Err(e) => {
                out.fail_with_trace(
                    &format!("Failed to create CRS from EPSG:{}", self.epsg),
                    &e.into(),
                );
                return Ok(false);
            }
        };
        out.pass(format_args!("Created CRS from EPSG:{}", self.epsg));
        match srs.authority() {
            Ok(authority) => out.detail(format_args!("CRS: {authority}")),
            Err(e) => log::debug!("EPSG:{} has no authority: {e}", self.epsg),
        }

        let proj4 = match srs.to_proj4() {
            Ok(proj4) => proj4,
            Err(e) => {
                out.fail_with_trace("Failed to export PROJ4 string", &e.into());
                return Ok(false);
            }
        };
        let proj4 = proj4.trim();

        if Self::is_wgs84_longlat(proj4) {
            out.pass(format_args!("PROJ4 string correct: {proj4}"));
            Ok(true)
        } else {
            out.fail(format_args!("Unexpected PROJ4 string: {proj4}"));
            Ok(false)
        }
    }
}
