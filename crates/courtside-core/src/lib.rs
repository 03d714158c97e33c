// Library root: configuration and logging shared by the Courtside binaries.

pub mod config;
pub mod logging;
