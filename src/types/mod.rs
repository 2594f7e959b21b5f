// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared value types.

pub mod id;
pub mod descriptor;

/// Value every byte reads back as after an erase.
pub const ERASED_VALUE: u8 = 0xFF;
