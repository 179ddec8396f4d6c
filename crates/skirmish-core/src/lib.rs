//! Core types and definitions for the skirmish targeting engine.
//!
//! This crate defines the vocabulary shared between the engine and its
//! host: the world snapshot schema (input), directives and HUD records
//! (output), action requests, configuration, and tuning constants.
//! It has no dependency on any runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod directive;
pub mod enums;
pub mod snapshot;
pub mod types;
