//! Core data structures for the Ovel simulation.

pub mod entity;
pub mod event;
pub mod geometry;
pub mod metrics;
pub mod registry;
pub mod state;
