pub mod filename;

pub use filename::FilenameParser;
