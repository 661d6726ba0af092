//! Base trait for intents (user/system actions) in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User commands (like, delete, edit, search)
/// - System events (fetch started, fetch results arrived)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
