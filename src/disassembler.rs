use core::fmt;

use alloc::string::{String, ToString};

use yaxpeax_arch::Decoder;

use crate::memory::{AddressableMemory, Memory, MemoryReader};
use crate::{DecodeError, InstDecoder, Instruction};

/// sequential disassembly over an [`AddressableMemory`].
///
/// a `Disassembler` owns a cursor into its memory. each decode starts at the cursor, or at an
/// explicitly provided address, and a successful decode leaves the cursor at the following
/// instruction. a failed decode leaves the cursor where the failed instruction started; callers
/// choose whether to [`skip_word`](Disassembler::skip_word) past it or stop.
pub struct Disassembler<'m, M: AddressableMemory + ?Sized = Memory> {
    memory: &'m M,
    decoder: InstDecoder,
    cursor: u32,
}

impl<'m, M: AddressableMemory + ?Sized> Disassembler<'m, M> {
    /// a disassembler with its cursor at the start of `memory`.
    pub fn new(memory: &'m M) -> Self {
        Disassembler {
            memory,
            decoder: InstDecoder::default(),
            cursor: memory.start_address(),
        }
    }

    pub fn with_decoder(mut self, decoder: InstDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// the address the next decode will start at.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn seek(&mut self, address: u32) {
        self.cursor = address;
    }

    /// move the cursor forward one word, as after an undecodable instruction.
    pub fn skip_word(&mut self) {
        self.cursor = self.cursor.wrapping_add(2);
    }

    /// decode the instruction at `address`, or at the cursor if `address` is `None`.
    pub fn decode_instruction(&mut self, address: Option<u32>) -> Result<Instruction, DecodeError> {
        if let Some(address) = address {
            self.cursor = address;
        }

        let mut reader = MemoryReader::new(self.memory, self.cursor);
        let inst = self.decoder.decode(&mut reader)?;
        self.cursor = self.cursor.wrapping_add(inst.len() as u32);
        Ok(inst)
    }

    /// decode the instruction at `address`, or at the cursor if `address` is `None`, and render
    /// it as text.
    pub fn decode(&mut self, address: Option<u32>) -> Result<String, DecodeError> {
        self.decode_instruction(address).map(|inst| inst.to_string())
    }

    /// iterate over instructions from the cursor to the end of memory.
    ///
    /// undecodable words are reported in the listing and skipped one word at a time.
    pub fn listing(&mut self) -> Listing<'_, 'm, M> {
        Listing { disassembler: self }
    }
}

/// one entry of a [`Listing`]: an address and what was found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub address: u32,
    pub result: Result<Instruction, DecodeError>,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.result {
            Ok(inst) => write!(f, "{:08x}: {}", self.address, inst),
            Err(e) => write!(f, "{:08x}: <{}>", self.address, e),
        }
    }
}

pub struct Listing<'d, 'm, M: AddressableMemory + ?Sized> {
    disassembler: &'d mut Disassembler<'m, M>,
}

impl<'d, 'm, M: AddressableMemory + ?Sized> Iterator for Listing<'d, 'm, M> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let address = self.disassembler.cursor;
        let memory = self.disassembler.memory;
        if address < memory.start_address() || address as u64 + 2 > memory.end_address() {
            return None;
        }

        let result = self.disassembler.decode_instruction(None);
        if result.is_err() {
            self.disassembler.skip_word();
        }
        Some(Line { address, result })
    }
}
