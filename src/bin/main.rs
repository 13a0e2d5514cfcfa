use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

use gdal_verify::cli::Cli;
use gdal_verify::config;
use gdal_verify::environment::Environment;
use gdal_verify::suite::Suite;
use gdal_verify::transcript::Transcript;

fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    // Failed checks print anyhow's backtraces; capture them unless the user chose otherwise.
    if std::env::var_os("RUST_BACKTRACE").is_none()
        && std::env::var_os("RUST_LIB_BACKTRACE").is_none()
    {
        std::env::set_var("RUST_LIB_BACKTRACE", "1");
    }

    config::route_errors_to_log();
    for (key, value) in &cli.config_options {
        match config::set_config_option(key, value) {
            Ok(()) => debug!("set GDAL config option {key}={value}"),
            Err(e) => error!("could not set GDAL config option {key}: {e}"),
        }
    }

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut out = Transcript::new(&mut stdout);

    out.title("GDAL Bundle Verification");
    Environment::current().report(&mut out);

    let summary = Suite::default().run(&mut out);
    summary.report(&mut out);
    drop(out);
    let _ = stdout.flush();

    ExitCode::from(summary.exit_code())
}
