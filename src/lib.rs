//! KeeBook — companion service that saves browser bookmarks into a
//! credential vault through a loopback listener.
//!
//! This library crate exposes all modules for use by the binary and
//! integration tests.

pub mod app;
pub mod database;
pub mod listener;
pub mod request_handler;
pub mod services;
pub mod store;
pub mod types;
