//! # FairShelf API
//!
//! HTTP surface of FairShelf, served with actix-web.

pub mod rest;

pub use rest::{configure, AppState, RestApi};
