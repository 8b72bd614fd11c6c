//! Archive format table.

pub mod detect;

pub use detect::ArchiveFormat;
pub use detect::Backend;
pub use detect::detect_format;
