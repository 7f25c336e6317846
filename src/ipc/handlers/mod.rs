pub mod content;
pub mod core;
pub mod dashboard;
pub mod roster;
pub mod session;
pub mod submissions;
