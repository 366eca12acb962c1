//! System orchestration, startup, and shutdown logic.

pub mod logging;
pub mod shop_system;

pub use logging::*;
pub use shop_system::*;
