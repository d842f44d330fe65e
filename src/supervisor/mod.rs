//! Connectivity supervisors.
//!
//! Two independent watchdogs over the external connectivity primitives:
//! the [`link`] supervisor keeps the network interface up (blocking,
//! bounded, escalates to restart), the [`session`] supervisor keeps the
//! publish session alive (non-blocking, rate-limited, never fatal).

pub mod link;
pub mod session;

pub use link::LinkSupervisor;
pub use session::{SessionPoll, SessionSupervisor};
