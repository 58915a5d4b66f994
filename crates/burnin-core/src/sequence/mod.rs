//! Positions within a timed sequence: frame counters and timecodes.

pub mod field;
pub mod frame;
pub mod timecode;

pub use field::{BoundedField, CoerceInt};
pub use frame::{Frame, FrameError};
pub use timecode::{Fps, Timecode, TimecodeBuilder, TimecodeError};
