pub mod aggregate;
pub mod combine;
pub mod config;
pub mod discipline;
pub mod error;
pub mod export;
pub mod high_score;
pub mod identity;
pub mod names;
pub mod normalize;
pub mod pipeline;
pub mod table;
pub mod workbook_io;
