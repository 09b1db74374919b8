pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod request_loop;
