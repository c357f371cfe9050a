#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod shuffle;
pub mod time;
pub mod validation;

pub use error::Error;
pub use shuffle::Shuffler;
pub use time::Clock;
pub use validation::{ValidationError, parse_question_set, validate};
