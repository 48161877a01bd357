mod data_file;
mod secret;

pub use data_file::DataFile;
pub use secret::{Secret, Variable};
