//! Controller layer: UI events and command orchestration.

pub mod events;
pub mod orchestration;
