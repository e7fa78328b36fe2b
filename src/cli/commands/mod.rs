pub mod auth;
pub mod data;
pub mod messages;
pub mod migrate;
pub mod profile;
pub mod server;
pub mod site;
