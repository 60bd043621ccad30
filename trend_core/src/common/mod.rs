pub mod enums;
pub mod time;
pub mod trend_error;
