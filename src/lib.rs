pub mod attributes;
pub mod badges;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod search;
pub mod source;
