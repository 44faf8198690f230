//! Session Gate Library
//!
//! Process-local authentication state machine. The gate binds at most one
//! identity to the interactive session and decides which application pages
//! are reachable. Protected work, including calls into the external
//! inference model, runs only after the gate allows it.

pub mod gate;
pub mod inference;
pub mod session;
pub mod throttle;

pub use gate::SessionGate;
pub use inference::{AccessDenied, InferenceError, Predictor};
pub use session::Session;
pub use throttle::LoginThrottle;
