//! # periodic-table
//!
//! Static directory of chemical elements, addressable by element symbol
//! (`"Fe"`) or Chinese name (`"铁"`).
//!
//! ```
//! use periodic_table::Directory;
//!
//! let fe = Directory::builtin().lookup("铁").unwrap();
//! assert_eq!(fe.symbol, "Fe");
//! assert_eq!(fe.atomic_number, 26);
//! ```

mod data;
mod directory;
mod record;

pub use data::BUILTIN_ELEMENTS;
pub use directory::{Directory, DirectoryError};
pub use record::ElementRecord;
