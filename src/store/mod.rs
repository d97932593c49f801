mod codec;
mod file;

pub use codec::{header, TableCodec, DEFAULT_DELIMITER};
pub use file::{backup_path, Store};
