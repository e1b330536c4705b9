//! mockexam-runner: Countdown clock and session event loop.
//!
//! Hosts hand a started [`Session`](mockexam_core::Session) to a
//! [`SessionDriver`], feed it commands over a channel, and receive the final
//! report once the session is submitted.

pub mod clock;
pub mod driver;

pub use clock::{Countdown, Tick};
pub use driver::{DriverOutcome, SessionDriver};
