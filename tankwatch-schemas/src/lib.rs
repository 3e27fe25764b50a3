pub mod alert;
pub mod document;
pub mod schedule;
pub mod tank;
