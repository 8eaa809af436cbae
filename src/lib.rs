pub mod config;
pub mod counter;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod handler;
pub mod state;
