//! Poison, train and evaluate a decision tree on the Iris dataset.
//!
//! Layers, outermost first:
//!
//! - `cli`: argument parsing and stdout for both binaries
//! - `application`: one use case per command
//! - `domain`: tables, Iris constants and the seams between layers
//! - `data`: CSV I/O, typed dataset, split and poisoning
//! - `ml`: decision tree fitting and scoring
//! - `infra`: model artifact, metrics, experiment tracking, logging

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
