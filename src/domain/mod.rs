pub mod document;
pub mod ranking;
pub mod supplier;
