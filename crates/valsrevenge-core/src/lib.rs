//! Core types and definitions for the Val's Revenge simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, physics categories, input commands, events, configuration
//! records, the save record, and tuning constants.
//! It has no dependency on the ECS or any host engine.

pub mod categories;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod objects;
pub mod save;
pub mod types;
