//! Terminal monitor for a plant sensor node published through a NETPIE
//! device shadow.
//!
//! The shadow is polled on a fixed interval; the light reading is converted
//! to lux and every value is classified into a status tier for display.

pub mod config;
pub mod models;
pub mod render;
pub mod sensors;
pub mod shadow;
pub mod utils;
