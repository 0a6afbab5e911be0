//! Time subsystem.
//!
//! `FrameClock` turns wall-clock time into a fixed-rate "render now" signal.
//! Use one clock per render loop and query it once per loop iteration.

mod frame_clock;

pub use frame_clock::FrameClock;
