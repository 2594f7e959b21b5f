// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! File-backed flash simulator.
//!
//! The device contents live in a file mapped with `memmap2`. The file is
//! opened lazily on first access. A newly created file is filled with the
//! erased value; an existing file is used as-is, which lets a test reopen the
//! same path to simulate a power cycle.
//!
//! Flash rules enforced on every build:
//! - writes start on a `write_alignment` boundary,
//! - writes only land on erased bytes (checked over the whole range before
//!   any byte is copied),
//! - erase is whole-sector only.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;
use tempfile::{NamedTempFile, TempPath};

use crate::config::{SimConfig, VERIFY_CHUNK_SIZE};
use crate::device::FlashDevice;
use crate::error::{FlashError, Result};
use crate::geometry::SectorGeometry;
use crate::types::descriptor::FlashDescriptor;
use crate::types::ERASED_VALUE;

struct Backing {
    map: MmapMut,
    _file: File,
    path: PathBuf,
    created: bool,
    // Removes the ephemeral file on drop.
    _temp: Option<TempPath>,
}

pub struct SimFlash {
    descriptor: FlashDescriptor,
    geometry: SectorGeometry,
    config: SimConfig,
    backing: Option<Backing>,
}

impl std::fmt::Debug for SimFlash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimFlash")
            .field("descriptor", &self.descriptor)
            .field("config", &self.config)
            .field("open", &self.backing.is_some())
            .finish()
    }
}

fn unavailable(path: &Path, source: io::Error) -> FlashError {
    FlashError::BackingStoreUnavailable {
        path: path.to_path_buf(),
        source,
    }
}

/// Opens `path` read/write, creating it if missing. Returns `(file, created)`.
fn open_or_create(path: &Path) -> Result<(File, bool)> {
    match OpenOptions::new().read(true).write(true).open(path) {
        Ok(file) => Ok((file, false)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| unavailable(path, e))?;
            Ok((file, true))
        }
        Err(e) => Err(unavailable(path, e)),
    }
}

impl SimFlash {
    pub fn new(
        base_address: u32,
        geometry: SectorGeometry,
        write_alignment: u32,
        config: SimConfig,
    ) -> Result<Self> {
        let descriptor = FlashDescriptor::new(base_address, &geometry, write_alignment)?;

        Ok(Self {
            descriptor,
            geometry,
            config,
            backing: None,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Backing file path, once the store has been opened.
    pub fn path(&self) -> Option<&Path> {
        self.backing.as_ref().map(|b| b.path.as_path())
    }

    /// Whether opening the store created a fresh, fully erased file.
    pub fn was_created(&self) -> Option<bool> {
        self.backing.as_ref().map(|b| b.created)
    }

    /// Absolute address of the sector starting at `address`, if any.
    pub fn find_sector(&self, address: u32) -> Option<usize> {
        let offset = address.checked_sub(self.descriptor.base_address)?;
        self.geometry.find_sector(offset)
    }

    fn open_backing(&self) -> Result<Backing> {
        let size = self.descriptor.total_size as u64;

        let (file, path, created, temp) = match &self.config.path {
            Some(path) => {
                let (file, created) = open_or_create(path)?;
                (file, path.clone(), created, None)
            }
            None => {
                let temp = NamedTempFile::new().map_err(|e| unavailable(&std::env::temp_dir(), e))?;
                let (file, temp_path) = temp.into_parts();
                let path = temp_path.to_path_buf();
                (file, path, true, Some(temp_path))
            }
        };

        if created {
            file.set_len(size).map_err(|e| unavailable(&path, e))?;
        } else {
            let len = file.metadata().map_err(|e| unavailable(&path, e))?.len();
            if len != size {
                return Err(unavailable(
                    &path,
                    io::Error::new(
                        ErrorKind::InvalidData,
                        format!("backing file is {} bytes, device is {} bytes", len, size),
                    ),
                ));
            }
        }

        // SAFETY: the mapping is owned by this device for its whole lifetime;
        // concurrent external modification of the file is outside the model.
        let mut map = unsafe { MmapMut::map_mut(&file) }.map_err(|e| unavailable(&path, e))?;

        if created {
            map.fill(ERASED_VALUE);
            map.flush().map_err(|e| unavailable(&path, e))?;
            tracing::info!("Created flash backing file {:?} ({} bytes)", path, size);
        } else {
            tracing::info!("Opened existing flash backing file {:?}", path);
        }

        Ok(Backing {
            map,
            _file: file,
            path,
            created,
            _temp: temp,
        })
    }

    fn store(&mut self) -> Result<&mut MmapMut> {
        let backing = match self.backing.take() {
            Some(backing) => backing,
            None => self.open_backing()?,
        };
        Ok(&mut self.backing.insert(backing).map)
    }

    /// Overwrites `len` bytes at `address` with `value`, bypassing the
    /// erase-before-write check. Used to fabricate partially programmed or
    /// corrupted states in tests.
    pub fn fill(&mut self, address: u32, value: u8, len: usize) -> Result<()> {
        self.descriptor.check_range(address, len)?;
        let start = self.descriptor.offset_of(address);
        let store = self.store()?;
        store[start..start + len].fill(value);
        Ok(())
    }

    /// Flushes outstanding changes to the backing file.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(backing) = self.backing.as_mut() {
            backing.map.flush().map_err(|e| unavailable(&backing.path, e))?;
        }
        Ok(())
    }

    /// Finds the first programmed byte in `[address, address + len)`,
    /// comparing through the read path one chunk at a time.
    fn first_programmed(&mut self, address: u32, len: usize) -> Result<Option<u32>> {
        let mut buf = [0u8; VERIFY_CHUNK_SIZE];
        let mut cur = 0usize;
        while cur < len {
            let chunk = (len - cur).min(VERIFY_CHUNK_SIZE);
            let chunk_addr = address + cur as u32;
            self.read(chunk_addr, &mut buf[..chunk])?;
            if let Some(pos) = buf[..chunk].iter().position(|&b| b != ERASED_VALUE) {
                return Ok(Some(chunk_addr + pos as u32));
            }
            cur += chunk;
        }
        Ok(None)
    }
}

impl FlashDevice for SimFlash {
    fn descriptor(&self) -> FlashDescriptor {
        self.descriptor
    }

    fn geometry(&self) -> &SectorGeometry {
        &self.geometry
    }

    fn init(&mut self) -> Result<()> {
        self.store()?;
        Ok(())
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.descriptor.check_range(address, buf.len())?;
        let start = self.descriptor.offset_of(address);
        let store = self.store()?;
        buf.copy_from_slice(&store[start..start + buf.len()]);
        tracing::trace!("flash read {:#010x}+{}", address, buf.len());
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if let Err(e) = self.descriptor.check_alignment(address) {
            tracing::error!("Rejected flash write: {}", e);
            return Err(e);
        }
        self.descriptor.check_range(address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        if let Some(conflict) = self.first_programmed(address, data.len())? {
            let e = FlashError::WriteOverlapViolation { address, conflict };
            tracing::error!("Rejected flash write: {}", e);
            return Err(e);
        }

        let start = self.descriptor.offset_of(address);
        let store = self.store()?;
        store[start..start + data.len()].copy_from_slice(data);
        tracing::trace!("flash write {:#010x}+{}", address, data.len());
        Ok(())
    }

    fn erase_sector(&mut self, sector_address: u32) -> Result<()> {
        let index = self
            .find_sector(sector_address)
            .ok_or(FlashError::UnknownSector(sector_address))?;
        let (offset, size) = self.geometry.sector_info(index)?;
        let start = offset as usize;
        let store = self.store()?;
        store[start..start + size as usize].fill(ERASED_VALUE);
        tracing::debug!("Erased sector {} at {:#010x} ({} bytes)", index, sector_address, size);
        Ok(())
    }

    fn sector_info(&self, index: usize) -> Result<(u32, u32)> {
        let (offset, size) = self.geometry.sector_info(index)?;
        Ok((self.descriptor.base_address + offset, size))
    }
}

impl Drop for SimFlash {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush flash backing store: {}", e);
        }
    }
}
