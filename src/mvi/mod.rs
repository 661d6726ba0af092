//! Model-View-Intent (MVI) primitives.
//!
//! Every change to catalog state flows one way:
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: value snapshot of everything a view renders
//! - **Intent**: user command or system event (fetch finished, like, ...)
//! - **Reducer**: pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ViewState;
