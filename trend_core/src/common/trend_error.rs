use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the trend estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Parameter and config errors (0-99)
    #[strum(serialize = "_PARA_ERR_BEGIN")]
    ParaErrBegin = 0,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 5,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 17,
    #[strum(serialize = "_PARA_ERR_END")]
    ParaErrEnd = 99,

    // Series data errors (200-299)
    #[strum(serialize = "_DATA_ERR_BEGIN")]
    DataErrBegin = 200,
    #[strum(serialize = "SERIES_NOT_ORDERED")]
    SeriesNotOrdered = 201,
    #[strum(serialize = "DUPLICATE_DATE")]
    DuplicateDate = 202,
    #[strum(serialize = "INSUFFICIENT_DATA")]
    InsufficientData = 203,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 204,
    #[strum(serialize = "_DATA_ERR_END")]
    DataErrEnd = 299,
}

impl ErrCode {
    pub fn is_data_err(&self) -> bool {
        let code = *self as i32;
        code > Self::DataErrBegin as i32 && code < Self::DataErrEnd as i32
    }

    pub fn is_para_err(&self) -> bool {
        let code = *self as i32;
        code > Self::ParaErrBegin as i32 && code < Self::ParaErrEnd as i32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{errcode}: {msg}")]
pub struct TrendError {
    pub errcode: ErrCode,
    pub msg: String,
}

impl TrendError {
    pub fn new(message: impl Into<String>, code: ErrCode) -> Self {
        Self {
            errcode: code,
            msg: message.into(),
        }
    }

    /// Shorthand for the "not enough observations" failure of the fitter.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::new(
            format!("need at least {} observations, got {}", required, actual),
            ErrCode::InsufficientData,
        )
    }

    pub fn is_data_err(&self) -> bool {
        self.errcode.is_data_err()
    }

    pub fn is_para_err(&self) -> bool {
        self.errcode.is_para_err()
    }
}

pub type TrendResult<T> = Result<T, TrendError>;
