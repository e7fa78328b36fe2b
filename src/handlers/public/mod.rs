// handlers/public/mod.rs - Public handlers (no session required)
//
// Site content, the contact form and token acquisition.
pub mod auth;
pub mod contact;
pub mod site;
