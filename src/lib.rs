//! # `yaxpeax-m68000`, a decoder for the MC68000 instruction set
//!
//! the MC68000 is a 16/32-bit CISC processor: registers and the address space are 32 bits wide,
//! but instructions are fetched as 16-bit words. every instruction is one opcode word followed by
//! zero or more extension words carrying displacements, absolute addresses, immediates, or
//! register masks. the top nibble of the opcode word selects one of sixteen "lines", and the
//! remaining fields are packed differently in nearly every line.
//!
//! `yaxpeax-m68000` decodes units of `u16`, requiring an `impl Reader<u32, u16>` to decode from.
//! there are impls to read from a big-endian `&[u8]`, from a `&[u16]`, and from anything that
//! implements [`AddressableMemory`]. addresses (and so instruction lengths) are in bytes.
//!
//! only the base MC68000 grammar is decoded. lines `1010` and `1111` are reserved for emulation
//! traps and coprocessors on this part, and are always reported as undefined.
//!
//! ## usage
//!
//! the fastest way to decode an m68000 instruction is through
//! [`InstDecoder::decode_slice()`]:
//! ```
//! use yaxpeax_m68000::InstDecoder;
//!
//! let inst = InstDecoder::decode_slice(&[0xde, 0x05]).unwrap();
//!
//! assert_eq!("ADD D5,D7", inst.to_string());
//! ```
//!
//! opcodes and operands are available on the decoded instruction, as well as its length and
//! operand count:
//! ```
//! use yaxpeax_m68000::{InstDecoder, Operand, Opcode, Size};
//!
//! let inst = InstDecoder::decode_u16(&[0xd839, 0x0000, 0x000f]).unwrap();
//!
//! assert_eq!("ADD (15).L,D4", inst.to_string());
//! assert_eq!(inst.operand_count(), 2);
//! assert_eq!(inst.len(), 6);
//! assert_eq!(inst.opcode(), Opcode::ADD);
//! assert_eq!(inst.size(), Some(Size::Byte));
//! assert_eq!(inst.operand(0), Operand::AbsoluteLong(15));
//! assert_eq!(inst.operand(1), Operand::DataRegister(4));
//! ```
//!
//! to walk a region of memory instruction by instruction, use a [`Disassembler`], which keeps a
//! cursor into an [`AddressableMemory`]:
//! ```
//! use yaxpeax_m68000::{Disassembler, Memory};
//!
//! let memory = Memory::from_bytes(&[0x60, 0x81, 0x5e, 0xcd, 0xff, 0x81], 0x1000);
//! let mut dis = Disassembler::new(&memory);
//!
//! assert_eq!(dis.decode(None).unwrap(), "BRA *-127");
//! assert_eq!(dis.decode(None).unwrap(), "DBGT D5,*-127");
//! assert_eq!(dis.cursor(), 0x1006);
//! ```
//!
//! additionally, `yaxpeax-m68000` implements `yaxpeax-arch` traits for generic use, such as
//! [`yaxpeax_arch::LengthedInstruction`]. [`yaxpeax_arch::Arch`] is implemented by
//! the unit struct [`M68000`].
//!
//! ## `#![no_std]`
//!
//! `yaxpeax-m68000` is `no_std`, but needs `alloc` for [`Memory`] and rendered listings.

#![no_std]

extern crate alloc;

mod decode;
mod disassembler;
mod display;
pub mod memory;

pub use decode::decode_effective_address;
pub use disassembler::{Disassembler, Line, Listing};
pub use memory::{AddressableMemory, Endianness, Memory, MemoryError, MemoryReader};

use yaxpeax_arch::{AddressDiff, Arch, Decoder, LengthedInstruction, Reader, ReadError, U8Reader};

/// a trivial struct for [`yaxpeax_arch::Arch`] to be implemented on. it's only interesting for the
/// associated type parameters.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone)]
pub struct M68000;

impl Arch for M68000 {
    type Address = u32;
    type Word = u16;
    type Instruction = Instruction;
    type Decoder = InstDecoder;
    type DecodeError = DecodeError;
    type Operand = Operand;
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecodeError {
    /// no input available but the instruction would require at least one more word to decode.
    /// reads past the end of an [`AddressableMemory`] region are reported this way too.
    ExhaustedInput,
    /// the word(s) to decode this instruction do not map to a defined instruction
    UnknownInstruction,
    /// an effective address used mode `7` with register `5`, `6`, or `7`
    UnsupportedAddressingMode,
    /// an operand's extension word holds a value the instruction can't take, such as a byte
    /// immediate with bits set in its high byte
    MalformedOperand,
    /// [`decode_effective_address`] was asked for an immediate operand without a size. the
    /// instruction decoder itself never reports this.
    MissingImmediateSize,
    /// the size field for an immediate operand was `0b11`
    UnsupportedImmediateSize,
}

impl From<yaxpeax_arch::ReadError> for DecodeError {
    fn from(_e: yaxpeax_arch::ReadError) -> Self {
        DecodeError::ExhaustedInput
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use yaxpeax_arch::DecodeError;
        f.write_str(self.description())
    }
}

impl yaxpeax_arch::DecodeError for DecodeError {
    fn data_exhausted(&self) -> bool {
        *self == DecodeError::ExhaustedInput
    }
    fn bad_opcode(&self) -> bool {
        *self == DecodeError::UnknownInstruction
    }
    fn bad_operand(&self) -> bool {
        match self {
            DecodeError::UnsupportedAddressingMode |
            DecodeError::MalformedOperand |
            DecodeError::MissingImmediateSize |
            DecodeError::UnsupportedImmediateSize => true,
            _ => false,
        }
    }
    fn description(&self) -> &'static str {
        match self {
            DecodeError::ExhaustedInput => "exhausted input",
            DecodeError::UnknownInstruction => "unknown instruction",
            DecodeError::UnsupportedAddressingMode => "unsupported addressing mode",
            DecodeError::MalformedOperand => "high byte of byte-immediate must be zero",
            DecodeError::MissingImmediateSize => "missing size for immediate operand",
            DecodeError::UnsupportedImmediateSize => "unsupported immediate size",
        }
    }
}

/// the width of an operation, as selected by an instruction's two-bit size field or forced by
/// the instruction itself.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Size {
    Byte,
    Word,
    Long,
}

const SIZE_SUFFIXES: [&str; 3] = ["", ".W", ".L"];

impl Size {
    /// interpret the common two-bit size field: `00` byte, `01` word, `10` long.
    ///
    /// `0b11` is not a size; the instructions that use this field either reinterpret it (`Scc`,
    /// `DBcc`, `ADDA`, ...) or are undefined.
    pub fn from_bits(bits: u8) -> Option<Size> {
        match bits {
            0b00 => Some(Size::Byte),
            0b01 => Some(Size::Word),
            0b10 => Some(Size::Long),
            _ => None,
        }
    }

    /// the mnemonic suffix for this size. bytes have no suffix.
    pub fn suffix(&self) -> &'static str {
        SIZE_SUFFIXES[*self as usize]
    }

    /// the number of bytes an operand of this size occupies in memory.
    pub fn bytes(&self) -> u8 {
        match self {
            Size::Byte => 1,
            Size::Word => 2,
            Size::Long => 4,
        }
    }
}

/// one of the sixteen conditions tested by `Bcc`, `Scc`, and `DBcc`, in encoding order.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum Condition {
    /// always true
    T,
    /// always false
    F,
    HI,
    LS,
    CC,
    CS,
    NE,
    EQ,
    VC,
    VS,
    PL,
    MI,
    GE,
    LT,
    GT,
    LE,
}

const CONDITIONS: [Condition; 16] = [
    Condition::T, Condition::F, Condition::HI, Condition::LS,
    Condition::CC, Condition::CS, Condition::NE, Condition::EQ,
    Condition::VC, Condition::VS, Condition::PL, Condition::MI,
    Condition::GE, Condition::LT, Condition::GT, Condition::LE,
];

impl Condition {
    /// select a condition by the low four bits of `bits`.
    pub fn from_bits(bits: u8) -> Condition {
        CONDITIONS[(bits & 0b1111) as usize]
    }
}

/// an `m68000` instruction.
///
/// `m68000` instructions have an [`Opcode`], an optional [`Size`], and up to two [`Operand`]s, in
/// source, destination order. they are between two and ten bytes long.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Instruction {
    opcode: Opcode,
    /// the size suffix this instruction is written with. `None` for instructions that are written
    /// without one, like `LEA` or `MOVEQ`.
    size: Option<Size>,
    operands: [Operand; 2],
    length: u8,
}

impl Default for Instruction {
    fn default() -> Instruction {
        Instruction {
            opcode: Opcode::NOP,
            size: None,
            operands: [Operand::Nothing, Operand::Nothing],
            length: 0,
        }
    }
}

impl Instruction {
    fn reset(&mut self) {
        self.size = None;
        self.operands = [Operand::Nothing, Operand::Nothing];
    }

    /// the length of this instruction, in bytes.
    pub fn len(&self) -> u8 {
        self.length
    }

    /// get the number of operands in this instruction.
    ///
    /// calls to `Instruction::operand` for indices between 0 and this value will return an operand
    /// other than `Operand::Nothing`.
    pub fn operand_count(&self) -> u8 {
        if self.operands[0] == Operand::Nothing {
            0
        } else if self.operands[1] == Operand::Nothing {
            1
        } else {
            2
        }
    }

    /// get the `Operand` at the provided index.
    ///
    /// indices above `1` will always yield `Operand::Nothing`.
    pub fn operand(&self, idx: u8) -> Operand {
        self.operands.get(idx as usize).copied().unwrap_or(Operand::Nothing)
    }

    /// get the `Opcode` of this instruction.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// get the operation size this instruction is written with, if any.
    pub fn size(&self) -> Option<Size> {
        self.size
    }
}

impl LengthedInstruction for Instruction {
    type Unit = AddressDiff<<M68000 as Arch>::Address>;
    fn min_size() -> Self::Unit {
        AddressDiff::from_const(2)
    }
    fn len(&self) -> Self::Unit {
        AddressDiff::from_const(self.length as u32)
    }
}

impl yaxpeax_arch::Instruction for Instruction {
    fn well_defined(&self) -> bool { true }
}

/// an operand for an `m68000` instruction.
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub enum Operand {
    /// no operand in this position.
    ///
    /// reaching this as a user of `yaxpeax_m68000` is almost certainly a bug.
    Nothing,
    /// `Dn`, data register direct
    DataRegister(u8),
    /// `An`, address register direct
    AddressRegister(u8),
    /// `(An)`
    Indirect(u8),
    /// `(An)+`
    PostIncrement(u8),
    /// `-(An)`
    PreDecrement(u8),
    /// `(d16,An)`: address register plus a sign-extended 16-bit displacement.
    Displacement(u8, i16),
    /// `(d8,An,Xn)`: address register, index register number, and a sign-extended 8-bit
    /// displacement. the index number is the low three bits of the extension word's high byte.
    Indexed(u8, u8, i8),
    /// `(xxx).W`, a sign-extended 16-bit absolute address
    AbsoluteShort(i16),
    /// `(xxx).L`, a 32-bit absolute address
    AbsoluteLong(u32),
    /// `(d16,PC)`
    PcDisplacement(i16),
    /// `(d8,PC,Xn)`, packed the same way as [`Operand::Indexed`]
    PcIndexed(u8, i8),
    /// `#<data>`. byte immediates are zero-extended, word immediates sign-extended.
    Immediate(i32),
    /// a branch displacement relative to the program counter, rendered `*+N` or `*-N`.
    Branch(i32),
    /// a `MOVEM` register list. bit `0` is `D0` through bit `7` for `D7`, then bits `8` to `15`
    /// for `A0` to `A7`, regardless of how the mask was ordered in the instruction.
    RegisterList(u16),
    /// `SR`, the status register
    StatusRegister,
    /// `CCR`, the condition code register
    ConditionCodes,
    /// `USP`, the user stack pointer
    UserStackPointer,
}

/// an `m68000` instruction's operation.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Hash, PartialEq, Eq)]
pub enum Opcode {
    /// `Inclusive-OR Immediate`, also with `CCR` or `SR` as destination
    ORI,
    /// `AND Immediate`, also with `CCR` or `SR` as destination
    ANDI,
    SUBI,
    ADDI,
    /// `Exclusive-OR Immediate`, also with `CCR` or `SR` as destination
    EORI,
    CMPI,
    /// `Test a Bit`
    ///
    /// `yaxpeax-m68000` records the bit number as the first operand, either a data register or an
    /// immediate already reduced modulo 32.
    BTST,
    /// `Test a Bit and Change`
    BCHG,
    /// `Test a Bit and Clear`
    BCLR,
    /// `Test a Bit and Set`
    BSET,
    /// `Move Peripheral Data`
    MOVEP,
    MOVE,
    MOVEA,
    NEGX,
    CLR,
    NEG,
    NOT,
    /// `Negate Decimal with Extend`
    NBCD,
    SWAP,
    /// `Push Effective Address`
    PEA,
    /// `Sign Extend`
    EXT,
    /// `Move Multiple Registers`
    ///
    /// the register list is always recorded as an [`Operand::RegisterList`] in canonical order.
    MOVEM,
    TST,
    /// `Test and Set an Operand`
    TAS,
    ILLEGAL,
    TRAP,
    LINK,
    UNLK,
    RESET,
    NOP,
    STOP,
    RTE,
    RTS,
    TRAPV,
    RTR,
    JSR,
    JMP,
    LEA,
    /// `Check Register Against Bounds`
    CHK,
    ADDQ,
    SUBQ,
    /// `Set According to Condition`
    Scc(Condition),
    /// `Test Condition, Decrement, and Branch`
    DBcc(Condition),
    /// `Branch Always`, encoded as `Bcc` with condition `T`
    BRA,
    /// `Branch to Subroutine`, encoded where `Bcc` with condition `F` would be
    BSR,
    Bcc(Condition),
    MOVEQ,
    DIVU,
    DIVS,
    /// `Subtract Decimal with Extend`
    SBCD,
    OR,
    SUB,
    SUBX,
    SUBA,
    CMP,
    CMPA,
    CMPM,
    EOR,
    MULU,
    MULS,
    /// `Add Decimal with Extend`
    ABCD,
    EXG,
    AND,
    ADD,
    ADDX,
    ADDA,
    ASL,
    ASR,
    LSL,
    LSR,
    ROXL,
    ROXR,
    ROL,
    ROR,
}

/// an `m68000` instruction decoder.
///
/// by default, the decoder reports what the hardware does. the only option controls how shift and
/// rotate counts of `0` in the instruction word are reported.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstDecoder {
    literal_shift_counts: bool,
}

impl InstDecoder {
    /// report immediate shift and rotate counts exactly as encoded. the hardware treats a count
    /// field of `0` as a count of 8, which is what the default decoder reports.
    pub fn with_literal_shift_counts(mut self) -> Self {
        self.literal_shift_counts = true;
        self
    }

    /// whether shift counts of `0` are reported as-is rather than as `8`.
    pub fn literal_shift_counts(&self) -> bool {
        self.literal_shift_counts
    }

    /// decode a slice of big-endian bytes into an instruction (or error)
    ///
    /// this is just a higher-level interface to the [`InstDecoder`] impl of
    /// [`yaxpeax_arch::Decoder`].
    pub fn decode_slice(data: &[u8]) -> Result<Instruction, <M68000 as Arch>::DecodeError> {
        InstDecoder::default()
            .decode(&mut M68000Reader::of_u8(data))
    }

    /// decode a slice of `u16` into an instruction (or error)
    ///
    /// this is just a higher-level interface to the [`InstDecoder`] impl of
    /// [`yaxpeax_arch::Decoder`].
    pub fn decode_u16(data: &[u16]) -> Result<Instruction, <M68000 as Arch>::DecodeError> {
        InstDecoder::default()
            .decode(&mut M68000Reader::of_u16(data))
    }
}

impl Default for InstDecoder {
    fn default() -> Self {
        InstDecoder {
            literal_shift_counts: false,
        }
    }
}

impl Decoder<M68000> for InstDecoder {
    fn decode_into<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(&self, inst: &mut Instruction, words: &mut T) -> Result<(), <M68000 as Arch>::DecodeError> {
        inst.length = 0;
        inst.reset();
        words.mark();
        let word = words.next()?;

        decode::decode_word(self, inst, word, words)?;

        inst.length = words.offset() as u8;
        Ok(())
    }
}

/// a reader of `m68000` words from byte or word slices. offsets are counted in bytes.
pub struct M68000Reader<T> {
    underlying: T,
    start: u32,
    mark: u32,
    offset: u32,
}

impl<'a> M68000Reader<&'a [u16]> {
    pub fn of_u16(data: &'a [u16]) -> Self {
        M68000Reader {
            underlying: data,
            start: 0,
            mark: 0,
            offset: 0,
        }
    }
}

impl<'a> Reader<u32, u16> for M68000Reader<&'a [u16]> {
    fn next(&mut self) -> Result<u16, ReadError> {
        if let Some(word) = self.underlying.get((self.offset / 2) as usize) {
            self.offset += 2;
            Ok(*word)
        } else {
            Err(ReadError::ExhaustedInput)
        }
    }

    fn next_n(&mut self, buf: &mut [u16]) -> Result<(), ReadError> {
        let remaining = self.underlying.len().saturating_sub((self.offset / 2) as usize);
        if buf.len() > remaining {
            return Err(ReadError::ExhaustedInput);
        }

        for i in 0..buf.len() {
            buf[i] = self.next()?;
        }

        Ok(())
    }

    fn mark(&mut self) {
        self.mark = self.offset;
    }

    fn offset(&mut self) -> u32 {
        self.offset - self.mark
    }

    fn total_offset(&mut self) -> u32 {
        self.offset - self.start
    }
}

impl<'a> M68000Reader<U8Reader<'a>> {
    pub fn of_u8(data: &'a [u8]) -> Self {
        M68000Reader {
            underlying: U8Reader::new(data),
            start: 0,
            mark: 0,
            offset: 0,
        }
    }
}

impl<'a> Reader<u32, u16> for M68000Reader<U8Reader<'a>> {
    fn next(&mut self) -> Result<u16, ReadError> {
        let high = Reader::<u32, u8>::next(&mut self.underlying)?;
        let low = Reader::<u32, u8>::next(&mut self.underlying)?;
        self.offset += 2;
        Ok(u16::from_be_bytes([high, low]))
    }

    fn next_n(&mut self, buf: &mut [u16]) -> Result<(), ReadError> {
        // a trailing odd byte is consumed before the error is reported; the offset only counts
        // whole words.
        for i in 0..buf.len() {
            buf[i] = self.next()?;
        }

        Ok(())
    }

    fn mark(&mut self) {
        Reader::<u32, u8>::mark(&mut self.underlying);
        self.mark = self.offset;
    }

    fn offset(&mut self) -> u32 {
        self.offset - self.mark
    }

    fn total_offset(&mut self) -> u32 {
        self.offset - self.start
    }
}
