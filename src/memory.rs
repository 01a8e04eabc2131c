//! a flat, byte-addressable region of memory for the decoder to read instructions from.
//!
//! [`AddressableMemory`] is the whole contract the decoder needs: a base address, a length, and
//! fixed-width reads in a configurable byte order. [`Memory`] is a `Vec`-backed implementation
//! that also supports writes, for loading images or building test fixtures.

use core::convert::TryFrom;
use core::fmt;
use core::ops::Range;

use alloc::vec;
use alloc::vec::Vec;

use yaxpeax_arch::{Reader, ReadError};

/// byte order for multi-byte accesses. the 68000 is big-endian, which is the default.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Big
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemoryError {
    /// `width` bytes at `address` are not all inside the memory region.
    OutOfBounds { address: u32, width: u32 },
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryError::OutOfBounds { address, width } => {
                write!(f, "access of {} byte(s) at {:#010x} is outside of memory", width, address)
            }
        }
    }
}

/// read access to a linear region of memory starting at `start_address()`.
///
/// addresses passed to accessors are absolute; implementations translate them relative to the
/// start of the region. reads that run off either end of the region are errors.
pub trait AddressableMemory {
    /// the address of the first byte in this region.
    fn start_address(&self) -> u32;
    /// the number of bytes in this region.
    fn len(&self) -> u32;
    /// byte order for multi-byte reads.
    fn endianness(&self) -> Endianness;

    fn get_u8(&self, address: u32) -> Result<u8, MemoryError>;
    fn get_u16(&self, address: u32) -> Result<u16, MemoryError>;
    fn get_u32(&self, address: u32) -> Result<u32, MemoryError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// the first address past the end of this region. a region that reaches the top of the
    /// address space reports `2^32`.
    fn end_address(&self) -> u64 {
        self.start_address() as u64 + self.len() as u64
    }

    fn get_i8(&self, address: u32) -> Result<i8, MemoryError> {
        self.get_u8(address).map(|v| v as i8)
    }

    fn get_i16(&self, address: u32) -> Result<i16, MemoryError> {
        self.get_u16(address).map(|v| v as i16)
    }

    fn get_i32(&self, address: u32) -> Result<i32, MemoryError> {
        self.get_u32(address).map(|v| v as i32)
    }
}

/// a `Vec`-backed [`AddressableMemory`] that can also be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
    start_address: u32,
    endianness: Endianness,
}

/// the most bytes a region at `start_address` can hold: it stops at the top of the address space
/// and its length fits in a `u32`.
fn capacity(start_address: u32) -> usize {
    let room = (1u64 << 32) - start_address as u64;
    room.min(u32::MAX as u64) as usize
}

impl Memory {
    /// `size` zeroed bytes, the first of which is at `start_address`. the region is cut short if
    /// it would run past the top of the address space.
    pub fn new(size: u32, start_address: u32) -> Self {
        let size = (size as usize).min(capacity(start_address));
        Memory {
            data: vec![0; size],
            start_address,
            endianness: Endianness::default(),
        }
    }

    /// a region holding a copy of `bytes`, the first of which is at `start_address`. bytes that
    /// would land past the top of the address space are dropped.
    pub fn from_bytes(bytes: &[u8], start_address: u32) -> Self {
        let len = bytes.len().min(capacity(start_address));
        Memory {
            data: bytes[..len].to_vec(),
            start_address,
            endianness: Endianness::default(),
        }
    }

    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    /// the backing bytes of this region, from `start_address` up.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn range(&self, address: u32, width: u32) -> Result<Range<usize>, MemoryError> {
        let out_of_bounds = MemoryError::OutOfBounds { address, width };
        let offset = address.checked_sub(self.start_address).ok_or(out_of_bounds)? as usize;
        let end = offset
            .checked_add(width as usize)
            .filter(|end| *end <= self.data.len())
            .ok_or(out_of_bounds)?;
        Ok(offset..end)
    }

    fn read<const N: usize>(&self, address: u32) -> Result<[u8; N], MemoryError> {
        let range = self.range(address, N as u32)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[range]);
        Ok(buf)
    }

    fn write(&mut self, address: u32, bytes: &[u8]) -> Result<(), MemoryError> {
        let width = u32::try_from(bytes.len())
            .map_err(|_| MemoryError::OutOfBounds { address, width: u32::MAX })?;
        let range = self.range(address, width)?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    pub fn get_u8(&self, address: u32) -> Result<u8, MemoryError> {
        let [b] = self.read::<1>(address)?;
        Ok(b)
    }

    pub fn get_i8(&self, address: u32) -> Result<i8, MemoryError> {
        self.get_u8(address).map(|v| v as i8)
    }

    pub fn get_u16(&self, address: u32) -> Result<u16, MemoryError> {
        let bytes = self.read::<2>(address)?;
        Ok(match self.endianness {
            Endianness::Big => u16::from_be_bytes(bytes),
            Endianness::Little => u16::from_le_bytes(bytes),
        })
    }

    pub fn get_i16(&self, address: u32) -> Result<i16, MemoryError> {
        self.get_u16(address).map(|v| v as i16)
    }

    pub fn get_u32(&self, address: u32) -> Result<u32, MemoryError> {
        let bytes = self.read::<4>(address)?;
        Ok(match self.endianness {
            Endianness::Big => u32::from_be_bytes(bytes),
            Endianness::Little => u32::from_le_bytes(bytes),
        })
    }

    pub fn get_i32(&self, address: u32) -> Result<i32, MemoryError> {
        self.get_u32(address).map(|v| v as i32)
    }

    pub fn set_u8(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        self.write(address, &[value])
    }

    pub fn set_i8(&mut self, address: u32, value: i8) -> Result<(), MemoryError> {
        self.set_u8(address, value as u8)
    }

    pub fn set_u16(&mut self, address: u32, value: u16) -> Result<(), MemoryError> {
        let bytes = match self.endianness {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        self.write(address, &bytes)
    }

    pub fn set_i16(&mut self, address: u32, value: i16) -> Result<(), MemoryError> {
        self.set_u16(address, value as u16)
    }

    pub fn set_u32(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        let bytes = match self.endianness {
            Endianness::Big => value.to_be_bytes(),
            Endianness::Little => value.to_le_bytes(),
        };
        self.write(address, &bytes)
    }

    pub fn set_i32(&mut self, address: u32, value: i32) -> Result<(), MemoryError> {
        self.set_u32(address, value as u32)
    }

    /// copy `bytes` into memory starting at `address`, as-is. nothing is written if any of
    /// `bytes` would land outside the region.
    pub fn load(&mut self, address: u32, bytes: &[u8]) -> Result<(), MemoryError> {
        self.write(address, bytes)
    }
}

impl AddressableMemory for Memory {
    fn start_address(&self) -> u32 {
        self.start_address
    }

    fn len(&self) -> u32 {
        self.data.len() as u32
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn get_u8(&self, address: u32) -> Result<u8, MemoryError> {
        Memory::get_u8(self, address)
    }

    fn get_u16(&self, address: u32) -> Result<u16, MemoryError> {
        Memory::get_u16(self, address)
    }

    fn get_u32(&self, address: u32) -> Result<u32, MemoryError> {
        Memory::get_u32(self, address)
    }
}

/// reads `m68000` words out of an [`AddressableMemory`], starting from a given address.
///
/// out-of-range reads end the input: they are reported as [`ReadError::ExhaustedInput`], which
/// the decoder reports as [`crate::DecodeError::ExhaustedInput`].
pub struct MemoryReader<'m, M: AddressableMemory + ?Sized> {
    memory: &'m M,
    start: u32,
    mark: u32,
    address: u32,
}

impl<'m, M: AddressableMemory + ?Sized> MemoryReader<'m, M> {
    pub fn new(memory: &'m M, address: u32) -> Self {
        MemoryReader {
            memory,
            start: address,
            mark: address,
            address,
        }
    }

    /// the address the next word will be read from.
    pub fn address(&self) -> u32 {
        self.address
    }
}

impl<'m, M: AddressableMemory + ?Sized> Reader<u32, u16> for MemoryReader<'m, M> {
    fn next(&mut self) -> Result<u16, ReadError> {
        let word = self.memory.get_u16(self.address).map_err(|_| ReadError::ExhaustedInput)?;
        self.address = self.address.wrapping_add(2);
        Ok(word)
    }

    fn next_n(&mut self, buf: &mut [u16]) -> Result<(), ReadError> {
        for i in 0..buf.len() {
            buf[i] = self.next()?;
        }

        Ok(())
    }

    fn mark(&mut self) {
        self.mark = self.address;
    }

    fn offset(&mut self) -> u32 {
        self.address.wrapping_sub(self.mark)
    }

    fn total_offset(&mut self) -> u32 {
        self.address.wrapping_sub(self.start)
    }
}
