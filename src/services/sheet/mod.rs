pub mod grades;
pub mod homework;
pub mod loader;
pub mod resolver;
pub mod table;
pub mod utils;

pub use grades::analyze_grades;
pub use homework::analyze_homework;
pub use loader::load_table;
pub use resolver::{positional_distance, resolve};
pub use table::{RawColumn, Table};
