pub mod output;
pub mod writers;

pub use output::{create_writer, OutputFormat, OutputWriter};
