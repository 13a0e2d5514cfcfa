use std::ffi::CString;
use std::sync::Mutex;

use gdal_sys::{CPLErr, CPLError};
use gdal_verify::config;
use log::{Level, Log, Metadata, Record};

struct Capture(Mutex<Vec<(Level, String, String)>>);

impl Log for Capture {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.0.lock().unwrap().push((
            record.level(),
            record.target().to_string(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

fn raise(class: CPLErr::Type, number: i32, msg: &str) {
    let msg = CString::new(msg.as_bytes()).unwrap();
    unsafe { CPLError(class, number, msg.as_ptr()) };
}

#[test]
fn test_errors_are_routed_to_log() {
    // One test only: the logger and GDAL's error handler are both process-wide.
    log::set_logger(&CAPTURE).unwrap();
    log::set_max_level(log::LevelFilter::Trace);

    config::route_errors_to_log();
    raise(CPLErr::CE_Failure, 42, "foo");
    raise(CPLErr::CE_Warning, 1, "bar");
    config::remove_error_handler();

    let gdal_records: Vec<_> = CAPTURE
        .0
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, target, _)| target == "gdal")
        .cloned()
        .collect();
    assert_eq!(
        gdal_records,
        vec![
            (Level::Error, "gdal".to_string(), "[42] foo".to_string()),
            (Level::Warn, "gdal".to_string(), "[1] bar".to_string()),
        ]
    );
}
