#[macro_use]
extern crate tracing;

pub mod animation;
pub mod input;
pub mod logging;
pub mod policy;
pub mod router;
pub mod state;
pub mod transition;
