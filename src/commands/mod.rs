pub mod build;
pub mod config_set;
pub mod list;
