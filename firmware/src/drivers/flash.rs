//! On-chip flash driver and the fixed-page record store
//!
//! Word programming and page erase through the flash memory controller
//! (FMA/FMD/FMC with the write key), plus a record store that keeps one
//! page of packed samples at a fixed offset. Every store erases and
//! rewrites the whole page; there is no wear-leveling and no
//! read-modify-write.

use core::fmt;
use core::ptr;

use hydrosense_sampling::record::{self, PAGE_WORDS};
use hydrosense_sampling::{Error as RecordError, Sample};
use static_assertions::const_assert;
use tm4c123x_hal::tm4c123x::FLASH_CTRL;

/// Bytes per erasable flash page on the TM4C123.
pub const PAGE_BYTES: u32 = 1024;

/// Fixed byte offset of the record page in flash.
///
/// Sits low in flash; a save erases the page unconditionally, so the
/// linked image must stay clear of it.
pub const STORE_OFFSET: u32 = 0x800;

// FMC opcodes carry the write key in the upper half-word
const FMC_WRKEY: u32 = 0xA442_0000;
const FMC_WRITE: u32 = 0x0000_0001;
const FMC_ERASE: u32 = 0x0000_0002;

// FCRIS/FCMISC access-violation bit
const FC_ACCESS: u32 = 0x0000_0001;

const_assert!(STORE_OFFSET % PAGE_BYTES == 0);
const_assert!(PAGE_WORDS * 4 == PAGE_BYTES as usize);

/// Faults the flash controller can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// The controller flagged an access violation (bad offset, or a
    /// write to a protected region).
    AccessViolation,
    /// Offset or length not on a word boundary.
    Unaligned,
}

impl fmt::Display for FlashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashError::AccessViolation => write!(f, "flash access violation"),
            FlashError::Unaligned => write!(f, "flash offset not word-aligned"),
        }
    }
}

/// The flash memory controller.
pub struct Flash {
    regs: FLASH_CTRL,
}

impl Flash {
    /// Take ownership of the controller.
    pub fn new(regs: FLASH_CTRL) -> Self {
        Flash { regs }
    }

    /// Erase the page containing `offset` back to all-ones.
    pub fn erase_page(&mut self, offset: u32) -> Result<(), FlashError> {
        if offset % PAGE_BYTES != 0 {
            return Err(FlashError::Unaligned);
        }
        self.regs.fma.write(|w| unsafe { w.bits(offset) });
        self.regs
            .fmc
            .write(|w| unsafe { w.bits(FMC_WRKEY | FMC_ERASE) });
        while self.regs.fmc.read().bits() & FMC_ERASE != 0 {}
        self.check_violation()
    }

    /// Program `words` starting at `offset`, one word at a time.
    ///
    /// The destination must have been erased first; flash programming
    /// can only clear bits.
    pub fn program(&mut self, offset: u32, words: &[u32]) -> Result<(), FlashError> {
        if offset % 4 != 0 {
            return Err(FlashError::Unaligned);
        }
        for (i, &word) in words.iter().enumerate() {
            self.regs.fmd.write(|w| unsafe { w.bits(word) });
            self.regs
                .fma
                .write(|w| unsafe { w.bits(offset + 4 * i as u32) });
            self.regs
                .fmc
                .write(|w| unsafe { w.bits(FMC_WRKEY | FMC_WRITE) });
            while self.regs.fmc.read().bits() & FMC_WRITE != 0 {}
        }
        self.check_violation()
    }

    /// Read `out.len()` words starting at `offset`.
    ///
    /// Flash is memory-mapped from address zero, so this is a plain
    /// volatile read.
    pub fn read_words(&self, offset: u32, out: &mut [u32]) {
        for (i, slot) in out.iter_mut().enumerate() {
            let addr = (offset as usize + 4 * i) as *const u32;
            *slot = unsafe { ptr::read_volatile(addr) };
        }
    }

    fn check_violation(&mut self) -> Result<(), FlashError> {
        if self.regs.fcris.read().bits() & FC_ACCESS != 0 {
            // Write-one-to-clear so the next operation starts clean
            self.regs.fcmisc.write(|w| unsafe { w.bits(FC_ACCESS) });
            return Err(FlashError::AccessViolation);
        }
        Ok(())
    }
}

/// Why a record-store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// The flash controller objected.
    Flash(FlashError),
    /// The record codec objected (capacity, header or checksum).
    Codec(RecordError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Flash(e) => write!(f, "{}", e),
            StoreError::Codec(e) => write!(f, "{}", e),
        }
    }
}

/// One page of packed sample records at [`STORE_OFFSET`].
pub struct RecordStore {
    flash: Flash,
}

impl RecordStore {
    /// Wrap the flash controller.
    pub fn new(flash: Flash) -> Self {
        RecordStore { flash }
    }

    /// Erase the record page and program `samples` into it.
    pub fn save(&mut self, samples: &[Sample]) -> Result<(), StoreError> {
        let mut page = [0u32; PAGE_WORDS];
        let used = record::pack(samples, &mut page).map_err(StoreError::Codec)?;
        self.flash
            .erase_page(STORE_OFFSET)
            .map_err(StoreError::Flash)?;
        self.flash
            .program(STORE_OFFSET, &page[..used])
            .map_err(StoreError::Flash)
    }

    /// Read the record page back into `out`, verifying the header and
    /// checksum. Returns the number of records recovered.
    pub fn load(&mut self, out: &mut [Sample]) -> Result<usize, StoreError> {
        let mut page = [0u32; PAGE_WORDS];
        self.flash.read_words(STORE_OFFSET, &mut page);
        record::unpack(&page, out).map_err(StoreError::Codec)
    }

    /// Release the flash controller.
    pub fn free(self) -> Flash {
        self.flash
    }
}
