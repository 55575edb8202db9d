//! Request handlers.

pub mod face_data;
pub mod health;

pub use face_data::*;
pub use health::*;
