use anyhow::{bail, Context};

use crate::checks::Check;
use crate::transcript::Transcript;
use crate::version::VersionInfo;
use crate::DriverManager;

/// Confirms the GDAL library is linked, callable and registers drivers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportCheck;

impl ImportCheck {
    fn probe() -> anyhow::Result<(String, usize)> {
        let summary = VersionInfo::VERSION_SUMMARY
            .value()
            .context("GDALVersionInfo(\"--version\")")?;
        let drivers = DriverManager::count();
        if drivers == 0 {
            bail!("GDALAllRegister() registered no drivers");
        }
        Ok((summary, drivers))
    }
}

impl Check for ImportCheck {
    fn title(&self) -> &str {
        "Import GDAL bindings"
    }

    fn run(&self, out: &mut Transcript<'_>) -> anyhow::Result<bool> {
        match Self::probe() {
            Ok((summary, drivers)) => {
                log::debug!("{drivers} drivers registered");
                out.pass("GDAL bindings loaded successfully");
                out.detail(format_args!("Version: {}", env!("CARGO_PKG_VERSION")));
                out.detail(format_args!("Library: {summary}"));
                Ok(true)
            }
            Err(e) => {
                out.fail(format_args!("Failed to load GDAL bindings: {e:#}"));
                Ok(false)
            }
        }
    }
}
