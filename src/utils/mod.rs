// Utils compartidos

pub mod categories;
pub mod constants;
pub mod jspdf_ffi;
pub mod storage;

pub use constants::*;
