pub mod enhance;
pub mod error;
