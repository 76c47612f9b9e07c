//! Rendering and timing engine for a scalable analog clock with chimes.

pub mod canvas;
pub mod chimes;
pub mod dial;
pub mod face;
pub mod hands;
pub mod macros;
pub mod scheduler;
pub mod surface;
pub mod text;
pub mod time;
