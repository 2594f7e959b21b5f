// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and simulator settings.

use std::path::PathBuf;

/// Environment variable naming a persistent backing file for the simulator.
pub const BACKING_FILE_ENV: &str = "FLASHSIM_FILE";

/// Bytes compared per step while checking that a write target is erased.
pub const VERIFY_CHUNK_SIZE: usize = 256;

/// Default NOR program page size used by the hardware adapter.
pub const DEFAULT_PAGE_SIZE: usize = 256;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimConfig {
    /// Persistent backing file. `None` selects an ephemeral file that is
    /// removed when the device is dropped.
    pub path: Option<PathBuf>,
}

impl SimConfig {
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// Reads [`BACKING_FILE_ENV`]. Unset or empty means ephemeral.
    pub fn from_env() -> Self {
        match std::env::var_os(BACKING_FILE_ENV) {
            Some(path) if !path.is_empty() => Self::with_path(path),
            _ => Self::ephemeral(),
        }
    }
}
