//! CLI command implementations.

mod detect;
mod scan;

pub use detect::DetectCmd;
pub use scan::ScanCmd;
