//! A barebones client for the Amazon Music web API, centred on its album model.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod album;
pub use album::*;

mod track;
pub use track::*;

mod request;
