//! ShadowCoach Library
//!
//! Core modules for the shadowing pronunciation-practice application.

pub mod config;
pub mod core;
pub mod error;
pub mod recognizer;
pub mod session;
