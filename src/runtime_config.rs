//! Environment-driven runtime configuration.
//!
//! Handler coroutines are spawned with a fixed stack size chosen at bind
//! time. The size is read from `MANIFOLD_STACK_SIZE`, which accepts decimal
//! (`65536`) or hexadecimal (`0x10000`) values. Too small a stack overflows
//! deep handlers; too large wastes memory across many concurrent coroutines.

use std::env;

/// Default coroutine stack size: 64 KiB.
const DEFAULT_STACK_SIZE: usize = 0x10000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for handler coroutines in bytes.
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let stack_size = match env::var("MANIFOLD_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
                } else {
                    val.parse().unwrap_or(DEFAULT_STACK_SIZE)
                }
            }
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}
