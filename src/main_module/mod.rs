//! Server wiring split out of main.rs

mod health;
mod server;
mod shutdown;

pub use health::*;
pub use server::*;
pub use shutdown::*;
