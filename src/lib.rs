//! Remnant Stock - countertop remnant inventory
//!
//! This library exports the core modules for testing and potential reuse.

pub mod app;
pub mod auth;
pub mod error;
pub mod image;
pub mod logging;
pub mod models;
pub mod storage;
pub mod ui;
