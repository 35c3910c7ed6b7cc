//! Core library components.
//!
//! Environment selection, resource naming, the pipeline model and its
//! per-variant blueprints, plus template rendering and synthesis.

pub mod action;
pub mod blueprint;
pub mod buildspec;
pub mod constants;
pub mod environment;
pub mod naming;
pub mod pipeline;
pub mod project;
pub mod stack;
pub mod synth;
pub mod template;
