/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Configuration for array allocation.
//!
//! The only tunable is an upper bound on the number of elements a
//! single array may allocate. It is read once from the environment
//! into a process-wide instance that [`crate::NdArray`] constructors
//! consult; callers that need a different bound pass an explicit
//! [`Config`] to [`crate::NdArray::with_config`].

use std::env;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable holding the element limit.
pub const MAX_ELEMENTS_ENV: &str = "NDMATRIX_MAX_ELEMENTS";

/// Allocation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of elements in one array.
    pub max_elements: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_elements: isize::MAX as usize,
        }
    }
}

impl Config {
    /// The effective element limit for arrays of `T`: the configured
    /// maximum, further capped so the allocation stays within
    /// `isize::MAX` bytes.
    pub fn limit_for<T>(&self) -> usize {
        let elem = std::mem::size_of::<T>().max(1);
        self.max_elements.min(isize::MAX as usize / elem)
    }
}

/// Load configuration from environment variables.
pub fn from_env() -> Config {
    parse(env::var(MAX_ELEMENTS_ENV).ok().as_deref())
}

fn parse(max_elements: Option<&str>) -> Config {
    let mut config = Config::default();
    if let Some(val) = max_elements {
        match val.trim().parse::<usize>() {
            Ok(parsed) => config.max_elements = parsed,
            Err(err) => tracing::warn!(
                "ignoring {}={:?}: {}; using default {}",
                MAX_ELEMENTS_ENV,
                val,
                err,
                config.max_elements
            ),
        }
    }
    config
}

/// Global configuration functions
pub mod global {
    use std::sync::LazyLock;
    use std::sync::PoisonError;
    use std::sync::RwLock;

    use super::*;

    /// Global configuration instance, initialized from environment variables.
    static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(from_env()));

    /// The current global configuration.
    pub fn get() -> Config {
        *CONFIG.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the global configuration, returning the previous one.
    pub fn set(config: Config) -> Config {
        let mut current = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, config)
    }

    /// Reset the global configuration to what the environment says.
    pub fn reset() {
        set(from_env());
    }
}
