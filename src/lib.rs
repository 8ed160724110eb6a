pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod reporter;
pub mod reshape;
pub mod source;
pub mod util;
