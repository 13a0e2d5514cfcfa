use clap::{ArgAction, Parser};

/// Verify that a prebuilt GDAL/PROJ library is linked and packaged correctly.
///
/// Runs every check and prints a transcript to stdout. Exits with 0 when all
/// checks pass and 1 otherwise.
#[derive(Debug, Parser)]
#[command(name = "gdal-verify", version)]
pub struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Set a GDAL configuration option before running, e.g. GDAL_DATA=/path
    #[arg(long = "config", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub config_options: Vec<(String, String)>,
}

impl Cli {
    /// Default `env_logger` filter; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    if s.contains('\0') {
        return Err("configuration options cannot contain NUL".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["gdal-verify"]).unwrap();
        assert_eq!(cli.verbose, 0);
        assert!(cli.config_options.is_empty());
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "gdal-verify",
            "-vv",
            "--config",
            "GDAL_DATA=/opt/gdal/share/gdal",
            "--config",
            "CPL_DEBUG=ON",
        ])
        .unwrap();
        assert_eq!(cli.log_filter(), "debug");
        assert_eq!(
            cli.config_options,
            vec![
                ("GDAL_DATA".to_string(), "/opt/gdal/share/gdal".to_string()),
                ("CPL_DEBUG".to_string(), "ON".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("PROJ_DATA=a=b").unwrap(),
            ("PROJ_DATA".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_val("CPL_DEBUG=").unwrap(),
            ("CPL_DEBUG".to_string(), String::new())
        );
        assert!(parse_key_val("GDAL_DATA").is_err());
        assert!(parse_key_val("=ON").is_err());
        assert!(parse_key_val("GDAL_DATA=a\0b").is_err());
    }
}
