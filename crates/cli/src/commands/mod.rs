// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod areas;
pub mod erase;
pub mod fill;
pub mod info;
pub mod read;
pub mod write;
