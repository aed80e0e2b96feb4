//! Front ends that put a [`crate::renderer::Scene`] on screen.

pub mod terminal;
