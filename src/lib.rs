pub mod data;
pub mod matcher;
pub mod oncogenic;
pub mod parser;
pub mod sequences;
pub mod static_data;
pub(crate) mod utils;
