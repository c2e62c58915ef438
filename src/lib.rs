pub mod catalog;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod sentiment;
