use std::ffi::NulError;
use std::str::Utf8Error;

use gdal_sys::{CPLErr, CPLErrorNum, OGRErr};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GdalError>;

#[derive(Clone, Debug, Error)]
pub enum GdalError {
    #[error("FfiNulError")]
    FfiNulError(#[from] NulError),
    #[error("StrUtf8Error")]
    StrUtf8Error(#[from] Utf8Error),
    #[cfg(feature = "ndarray")]
    #[error(transparent)]
    NdarrayShapeError(#[from] ndarray::ShapeError),
    #[error("CPL error class: '{class:?}', error number: '{number}', error msg: '{msg}'")]
    CplError {
        class: CplErrType,
        number: CPLErrorNum,
        msg: String,
    },
    #[error("GDAL method '{method_name}' returned a NULL pointer. Error msg: '{msg}'")]
    NullPointer {
        method_name: &'static str,
        msg: String,
    },
    #[error("OGR method '{method_name}' returned error: '{err:?}'")]
    OgrError {
        err: OGRErr::Type,
        method_name: &'static str,
    },
    #[error("Bad argument: {0}")]
    BadArgument(String),
    #[error("Unable to unlink mem file: {file_name}")]
    UnlinkMemFile { file_name: String },
    #[error("In-memory file '{file_name}' already exists")]
    MemFileInUse { file_name: String },
}

/// A wrapper for [`CPLErr::Type`] that reflects it as an enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum CplErrType {
    None = 0,
    Debug = 1,
    Warning = 2,
    Failure = 3,
    Fatal = 4,
}

impl From<CPLErr::Type> for CplErrType {
    fn from(error_type: CPLErr::Type) -> Self {
        match error_type {
            CPLErr::CE_Debug => Self::Debug,
            CPLErr::CE_Warning => Self::Warning,
            CPLErr::CE_Failure => Self::Failure,
            CPLErr::CE_Fatal => Self::Fatal,
            // CE_None, and anything GDAL adds later
            _ => Self::None,
        }
    }
}
