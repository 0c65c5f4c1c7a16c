//! Engine layer - what a host application embeds
//!
//! - [`session`]: input lock, action outcomes and JSON save/load
//! - [`reveal`]: advisory animation timing for committed actions
//! - [`place`]: rotate-then-place as one atomic action

pub mod place;
pub mod reveal;
pub mod session;

pub use place::apply_place;
pub use reveal::{RevealKind, RevealSchedule, RevealStep};
pub use session::{ActionKind, ActionOutcome, Session, SessionError};
