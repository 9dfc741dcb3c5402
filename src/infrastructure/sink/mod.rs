//! Sample sink adapters

mod file;

pub use file::FileSink;
