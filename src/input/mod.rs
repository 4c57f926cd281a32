pub mod parse;

pub use parse::{parse_datetime, split_list};
