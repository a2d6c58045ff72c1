mod error;

pub use error::ScanError;
