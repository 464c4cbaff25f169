//! Game module - level lifecycle

mod level;

pub use level::Level;
