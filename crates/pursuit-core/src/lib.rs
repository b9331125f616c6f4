//! Core types and definitions for the PURSUIT simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, the controller law, robot and target components, render
//! snapshots, events, configuration and errors. It has no dependency on
//! any runtime, window or renderer.

pub mod components;
pub mod config;
pub mod constants;
pub mod controller;
pub mod enums;
pub mod error;
pub mod events;
pub mod geometry;
pub mod proximity;
pub mod state;
pub mod types;
