//! Board-agnostic core logic for the WiFi clock firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (WiFi link, time service, clock)
//! - Connectivity manager with bounded connect/reconnect waits
//! - Time source with startup sync retries and a runtime resync budget
//! - Render engine with minute-change repaint and color cycling
//! - Status reporter with duplicate suppression
//! - Main loop controller and its lifecycle state machine
//! - Configuration types and the `clock.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[macro_use]
mod fmt;

pub mod config;
pub mod connectivity;
pub mod controller;
pub mod render;
pub mod retry;
pub mod state;
pub mod status;
pub mod text;
pub mod time;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
