pub mod archive;
pub mod config;
pub mod filename;
pub mod notify;
pub mod result_error;
pub mod retention;
pub mod scheduler;
pub mod store;
pub mod task;
pub mod validate;
