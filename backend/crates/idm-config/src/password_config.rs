use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Argon2id work factor bounds
pub const MIN_MEMORY_KIB: u32 = 1024;
pub const MAX_MEMORY_KIB: u32 = 1_048_576;
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;

pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_ITERATIONS: u32 = 2;

pub const MIN_PARALLELISM: u32 = 1;
pub const MAX_PARALLELISM: u32 = 16;
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Cost parameters for newly hashed passwords.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl PasswordConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.memory_kib < MIN_MEMORY_KIB || self.memory_kib > MAX_MEMORY_KIB {
            return Err(ConfigError::password(format!(
                "password.memory_kib must be {}-{}, got {}",
                MIN_MEMORY_KIB, MAX_MEMORY_KIB, self.memory_kib
            )));
        }

        if self.iterations < MIN_ITERATIONS || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::password(format!(
                "password.iterations must be {}-{}, got {}",
                MIN_ITERATIONS, MAX_ITERATIONS, self.iterations
            )));
        }

        if self.parallelism < MIN_PARALLELISM || self.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::password(format!(
                "password.parallelism must be {}-{}, got {}",
                MIN_PARALLELISM, MAX_PARALLELISM, self.parallelism
            )));
        }

        Ok(())
    }
}
