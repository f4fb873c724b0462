//! Touch input as the engine sees it.

pub mod fling_block;
pub mod signal;
pub mod swipe_tracker;

pub use self::fling_block::FlingBlockCheck;
pub use self::signal::GestureSignal;
pub use self::swipe_tracker::SwipeTracker;
