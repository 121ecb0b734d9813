//! The `utils` module collects shared helpers used across `peerhub`,
//! currently logging initialization.

pub mod logging;
