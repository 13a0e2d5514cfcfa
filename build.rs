use semver::Version;
use std::process::Command;

/// Runs `$RUSTC --version`, expecting "rustc X.Y.Z (hash date)".
fn rustc_version_string() -> Option<String> {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Version of `package` pinned in `lock`, the text of a `Cargo.lock`.
fn locked_version(lock: &str, package: &str) -> Option<Version> {
    let name_line = format!("name = \"{package}\"");
    let mut lines = lock.lines();
    lines.find(|line| line.trim() == name_line)?;
    let version = lines.next()?.trim().strip_prefix("version = ")?;
    Version::parse(version.trim_matches('"')).ok()
}

/// Resolved `ndarray` version, when the dependency is enabled.
fn emit_ndarray_version() {
    if std::env::var_os("CARGO_FEATURE_NDARRAY").is_none() {
        return;
    }
    let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let lock_path = std::path::Path::new(&manifest_dir).join("Cargo.lock");
    println!("cargo:rerun-if-changed={}", lock_path.display());

    let version = std::fs::read_to_string(&lock_path)
        .ok()
        .and_then(|lock| locked_version(&lock, "ndarray"));
    match version {
        Some(version) => println!("cargo:rustc-env=GDAL_VERIFY_NDARRAY_VERSION={version}"),
        None => println!("cargo:warning=could not resolve the ndarray version from Cargo.lock"),
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=RUSTC");

    let summary = match rustc_version_string() {
        Some(summary) => summary,
        None => {
            println!("cargo:warning=could not run rustc --version");
            "rustc (unknown)".to_string()
        }
    };

    let semver_substring = summary.split_whitespace().nth(1).unwrap_or_default();
    if let Err(e) = Version::parse(semver_substring) {
        println!("cargo:warning=unexpected rustc version \"{summary}\": {e}");
    }

    println!("cargo:rustc-env=GDAL_VERIFY_RUSTC_SUMMARY={summary}");

    emit_ndarray_version();
}
