pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod crud;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;

pub use app::{app, AppState};
