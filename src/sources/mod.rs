mod exports;

pub use exports::{read_all, read_file};
