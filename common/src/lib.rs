pub mod file_format;
pub mod file_utils;
pub mod log_setup;
pub mod serde;
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use file_format::{get_file_extension, FileExtensionError, FileFormat, FileFormatResult};
