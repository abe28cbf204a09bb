pub mod table;

pub use table::{format_general, format_scientific, write_record};
