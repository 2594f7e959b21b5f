// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Sector geometry table.
//!
//! Sector starts are offsets relative to the device base. Sector `i` spans
//! `starts[i]..starts[i + 1]`, and the last sector runs to `total_size`.

use crate::error::{FlashError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectorGeometry {
    starts: Vec<u32>,
    total_size: u32,
}

impl SectorGeometry {
    /// Builds a table, rejecting anything that does not tile `[0, total_size)`.
    pub fn new(starts: impl Into<Vec<u32>>, total_size: u32) -> Result<Self> {
        let starts = starts.into();

        match starts.first() {
            None => return Err(FlashError::InvalidGeometry("no sectors".into())),
            Some(&first) if first != 0 => {
                return Err(FlashError::InvalidGeometry(format!(
                    "first sector starts at {:#x}, expected 0",
                    first
                )))
            }
            _ => {}
        }

        for pair in starts.windows(2) {
            if pair[1] <= pair[0] {
                return Err(FlashError::InvalidGeometry(format!(
                    "sector start {:#x} does not follow {:#x}",
                    pair[1], pair[0]
                )));
            }
        }

        // Checked above: starts is non-empty.
        let last = starts[starts.len() - 1];
        if last >= total_size {
            return Err(FlashError::InvalidGeometry(format!(
                "last sector start {:#x} is beyond device size {:#x}",
                last, total_size
            )));
        }

        Ok(Self { starts, total_size })
    }

    /// `count` equally sized sectors.
    pub fn uniform(sector_size: u32, count: usize) -> Result<Self> {
        if sector_size == 0 {
            return Err(FlashError::InvalidGeometry("zero sector size".into()));
        }
        let total = (sector_size as u64) * (count as u64);
        let total_size = u32::try_from(total)
            .map_err(|_| FlashError::InvalidGeometry(format!("device size {:#x} exceeds 32 bits", total)))?;
        let starts: Vec<u32> = (0..count as u32).map(|i| i * sector_size).collect();
        Self::new(starts, total_size)
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Relative start offsets, ascending.
    pub fn starts(&self) -> &[u32] {
        &self.starts
    }

    /// Size of sector `index`. Caller guarantees `index < len()`.
    fn sector_len(&self, index: usize) -> u32 {
        let end = match self.starts.get(index + 1) {
            Some(&next) => next,
            None => self.total_size,
        };
        end - self.starts[index]
    }

    /// `(offset, size)` of sector `index`, offset relative to the device base.
    pub fn sector_info(&self, index: usize) -> Result<(u32, u32)> {
        if index >= self.starts.len() {
            return Err(FlashError::IndexOutOfRange {
                index,
                count: self.starts.len(),
            });
        }
        Ok((self.starts[index], self.sector_len(index)))
    }

    /// Index of the sector starting exactly at `offset`.
    pub fn find_sector(&self, offset: u32) -> Option<usize> {
        self.starts.iter().position(|&start| start == offset)
    }

    /// Every `(offset, size)` pair in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.starts.len()).map(move |i| (self.starts[i], self.sector_len(i)))
    }

    /// Sectors that intersect the relative range `[offset, offset + len)`.
    pub fn sectors_overlapping(&self, offset: u32, len: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        let end = offset as u64 + len as u64;
        self.iter().filter(move |&(start, size)| {
            len > 0 && (start as u64) < end && start as u64 + size as u64 > offset as u64
        })
    }
}
