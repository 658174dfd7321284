//! Property records and the text-cleaning rules for their fields

mod clean;
mod record;

pub use clean::{clean_area, clean_integer, clean_money, FieldError};
pub use record::{PropertyRecord, DEFAULT_BROKER};
