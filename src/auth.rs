//! Access token models: the redacted secret, its decoded claims, and the session state built
//! from both.

pub mod claims;
pub mod secret;
pub mod state;

pub use claims::*;
pub use secret::*;
pub use state::*;
