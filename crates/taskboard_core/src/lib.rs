pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod session;
pub mod storage;
