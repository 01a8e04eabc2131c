use yaxpeax_arch::{Arch, Reader};

use crate::{Condition, DecodeError, InstDecoder, Instruction, M68000, Opcode, Operand, Size};

/// read a 32-bit extension: two words, most significant first, the order the processor fetches
/// them in.
fn read_u32<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T) -> Result<u32, DecodeError> {
    let high = words.next()?;
    let low = words.next()?;
    Ok(((high as u32) << 16) | low as u32)
}

/// read immediate data of `size` from the extension words.
///
/// byte immediates still occupy a full word, and the high byte of that word must be zero.
fn read_immediate<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, size: Size) -> Result<i32, DecodeError> {
    match size {
        Size::Byte => {
            let word = words.next()?;
            if word & 0xff00 != 0 {
                return Err(DecodeError::MalformedOperand);
            }
            Ok((word & 0x00ff) as i32)
        }
        Size::Word => {
            Ok(words.next()? as i16 as i32)
        }
        Size::Long => {
            Ok(read_u32(words)? as i32)
        }
    }
}

/// brief extension word: signed displacement in the low byte, index register number in the low
/// three bits of the high byte.
fn index_extension(ext: u16) -> (u8, i8) {
    (((ext >> 8) & 0b111) as u8, ext as u8 as i8)
}

/// decode the effective address selected by `mode` and `reg`, consuming whatever extension words
/// that mode needs from `words`.
///
/// `size` is only consulted for immediate data (mode `7`, register `4`); if an immediate is
/// encountered without a size, decoding fails with [`DecodeError::MissingImmediateSize`].
///
/// ```
/// use yaxpeax_m68000::{decode_effective_address, M68000Reader, Operand, Size};
///
/// let mut words = M68000Reader::of_u16(&[0xfffc]);
/// let ea = decode_effective_address(&mut words, 5, 3, None).unwrap();
/// assert_eq!(ea, Operand::Displacement(3, -4));
/// assert_eq!(ea.to_string(), "(-4,A3)");
/// ```
pub fn decode_effective_address<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, mode: u8, reg: u8, size: Option<Size>) -> Result<Operand, DecodeError> {
    let reg = reg & 0b111;
    let operand = match mode {
        0 => Operand::DataRegister(reg),
        1 => Operand::AddressRegister(reg),
        2 => Operand::Indirect(reg),
        3 => Operand::PostIncrement(reg),
        4 => Operand::PreDecrement(reg),
        5 => {
            Operand::Displacement(reg, words.next()? as i16)
        },
        6 => {
            let (index, disp) = index_extension(words.next()?);
            Operand::Indexed(reg, index, disp)
        },
        7 => {
            match reg {
                0 => Operand::AbsoluteShort(words.next()? as i16),
                1 => Operand::AbsoluteLong(read_u32(words)?),
                2 => Operand::PcDisplacement(words.next()? as i16),
                3 => {
                    let (index, disp) = index_extension(words.next()?);
                    Operand::PcIndexed(index, disp)
                }
                4 => {
                    let size = size.ok_or(DecodeError::MissingImmediateSize)?;
                    Operand::Immediate(read_immediate(words, size)?)
                }
                _ => {
                    return Err(DecodeError::UnsupportedAddressingMode);
                }
            }
        }
        _ => {
            return Err(DecodeError::UnsupportedAddressingMode);
        }
    };
    Ok(operand)
}

/// like `decode_effective_address`, for destinations that must be alterable: the pc-relative and
/// immediate forms are not valid here.
fn decode_alterable<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, mode: u8, reg: u8) -> Result<Operand, DecodeError> {
    if mode == 7 && (2..=4).contains(&reg) {
        return Err(DecodeError::UnknownInstruction);
    }
    decode_effective_address(words, mode, reg, None)
}

/// alterable, and not an address register: the destination of most read-modify-write operations.
fn decode_data_alterable<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, mode: u8, reg: u8) -> Result<Operand, DecodeError> {
    if mode == 1 {
        return Err(DecodeError::UnknownInstruction);
    }
    decode_alterable(words, mode, reg)
}

/// any mode but address register direct.
fn decode_data<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, mode: u8, reg: u8, size: Size) -> Result<Operand, DecodeError> {
    if mode == 1 {
        return Err(DecodeError::UnknownInstruction);
    }
    decode_effective_address(words, mode, reg, Some(size))
}

/// the control modes: memory operands with no side effects on the address register and no
/// immediate. used where only an address is meaningful (`LEA`, `JMP`, ...).
fn decode_control<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(words: &mut T, mode: u8, reg: u8) -> Result<Operand, DecodeError> {
    match (mode, reg) {
        (2, _) | (5, _) | (6, _) => {}
        // registers 5-7 still fail as unsupported addressing modes
        (7, r) if r != 4 => {}
        _ => {
            return Err(DecodeError::UnknownInstruction);
        }
    }
    decode_effective_address(words, mode, reg, None)
}

/// operands for the `ABCD`/`SBCD`/`ADDX`/`SUBX` shape: `Dy,Dx` or `-(Ay),-(Ax)` by bit 3.
fn register_pair(word: u16) -> [Operand; 2] {
    let rx = ((word >> 9) & 0b111) as u8;
    let ry = (word & 0b111) as u8;
    if word & 0b1000 == 0 {
        [Operand::DataRegister(ry), Operand::DataRegister(rx)]
    } else {
        [Operand::PreDecrement(ry), Operand::PreDecrement(rx)]
    }
}

pub(crate) fn decode_word<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(decoder: &InstDecoder, inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    match word >> 12 {
        0b0000 => decode_bit_immediate(inst, word, words),
        0b0001 |
        0b0010 |
        0b0011 => decode_move(inst, word, words),
        0b0100 => decode_misc(inst, word, words),
        0b0101 => decode_quick(inst, word, words),
        0b0110 => decode_branch(inst, word, words),
        0b0111 => {
            // MOVEQ
            if word & 0x0100 != 0 {
                return Err(DecodeError::UnknownInstruction);
            }
            inst.opcode = Opcode::MOVEQ;
            inst.operands = [
                Operand::Immediate(word as u8 as i8 as i32),
                Operand::DataRegister(((word >> 9) & 0b111) as u8),
            ];
            Ok(())
        }
        0b1000 => decode_or_div(inst, word, words),
        0b1001 => decode_arithmetic(inst, word, words, [Opcode::SUB, Opcode::SUBX, Opcode::SUBA]),
        0b1011 => decode_cmp_eor(inst, word, words),
        0b1100 => decode_and_mul(inst, word, words),
        0b1101 => decode_arithmetic(inst, word, words, [Opcode::ADD, Opcode::ADDX, Opcode::ADDA]),
        0b1110 => decode_shift(decoder, inst, word, words),
        // `1010` and `1111` are unimplemented on the 68000; they trap as line-a and line-f
        // emulator instructions.
        _ => Err(DecodeError::UnknownInstruction),
    }
}

/// line `0000`: immediate arithmetic and logic, static and dynamic bit operations, and `MOVEP`.
fn decode_bit_immediate<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    const BIT_OPS: [Opcode; 4] = [Opcode::BTST, Opcode::BCHG, Opcode::BCLR, Opcode::BSET];

    // the CCR and SR forms are encoded as immediate-to-immediate, which the general form would
    // happily misparse, so they're matched as whole words first.
    match word {
        0x003c | 0x023c | 0x0a3c => {
            inst.opcode = match word {
                0x003c => Opcode::ORI,
                0x023c => Opcode::ANDI,
                _ => Opcode::EORI,
            };
            let data = read_immediate(words, Size::Byte)?;
            inst.operands = [Operand::Immediate(data), Operand::ConditionCodes];
            return Ok(());
        }
        0x007c | 0x027c | 0x0a7c => {
            inst.opcode = match word {
                0x007c => Opcode::ORI,
                0x027c => Opcode::ANDI,
                _ => Opcode::EORI,
            };
            let data = read_immediate(words, Size::Word)?;
            inst.operands = [Operand::Immediate(data), Operand::StatusRegister];
            return Ok(());
        }
        _ => {}
    }

    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    if opmode & 0b100 == 0 {
        if rx == 0b100 {
            // static bit number: only the low five bits are significant, the processor takes the
            // number modulo 32.
            let bit = words.next()? & 0x1f;
            inst.opcode = BIT_OPS[opmode as usize];
            let dest = if inst.opcode == Opcode::BTST {
                // the bit number already took the immediate slot
                if mode == 7 && reg == 4 {
                    return Err(DecodeError::UnknownInstruction);
                }
                decode_data(words, mode, reg, Size::Byte)?
            } else {
                decode_data_alterable(words, mode, reg)?
            };
            inst.operands = [Operand::Immediate(bit as i32), dest];
            return Ok(());
        }

        const IMMEDIATE_OPS: [Option<Opcode>; 8] = [
            Some(Opcode::ORI), Some(Opcode::ANDI), Some(Opcode::SUBI), Some(Opcode::ADDI),
            None, Some(Opcode::EORI), Some(Opcode::CMPI), None,
        ];

        let opcode = IMMEDIATE_OPS[rx as usize].ok_or(DecodeError::UnknownInstruction)?;
        let size = Size::from_bits(opmode).ok_or(DecodeError::UnsupportedImmediateSize)?;
        let data = read_immediate(words, size)?;
        inst.opcode = opcode;
        inst.size = Some(size);
        inst.operands = [Operand::Immediate(data), decode_data_alterable(words, mode, reg)?];
        Ok(())
    } else if mode == 0b001 {
        // MOVEP shares its encoding space with the dynamic bit operations; address register
        // direct is never a valid bit operation destination.
        inst.opcode = Opcode::MOVEP;
        inst.size = Some(if opmode & 0b001 == 0 { Size::Word } else { Size::Long });
        let memory = Operand::Displacement(reg, words.next()? as i16);
        let register = Operand::DataRegister(rx);
        inst.operands = if opmode & 0b010 == 0 {
            [memory, register]
        } else {
            [register, memory]
        };
        Ok(())
    } else {
        inst.opcode = BIT_OPS[(opmode & 0b11) as usize];
        let dest = if inst.opcode == Opcode::BTST {
            decode_data(words, mode, reg, Size::Byte)?
        } else {
            decode_data_alterable(words, mode, reg)?
        };
        inst.operands = [Operand::DataRegister(rx), dest];
        Ok(())
    }
}

/// lines `0001`, `0010`, `0011`: `MOVE` and `MOVEA` of bytes, longs, and words respectively.
fn decode_move<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let size = match word >> 12 {
        0b0001 => Size::Byte,
        0b0011 => Size::Word,
        _ => Size::Long,
    };
    let dest_reg = ((word >> 9) & 0b111) as u8;
    let dest_mode = ((word >> 6) & 0b111) as u8;
    let src_mode = ((word >> 3) & 0b111) as u8;
    let src_reg = (word & 0b111) as u8;

    if dest_mode == 0b001 {
        if size == Size::Byte {
            return Err(DecodeError::UnknownInstruction);
        }
        inst.opcode = Opcode::MOVEA;
    } else {
        inst.opcode = Opcode::MOVE;
    }
    inst.size = Some(size);

    // source extension words come first. address registers can't be read as bytes.
    let src = if size == Size::Byte {
        decode_data(words, src_mode, src_reg, size)?
    } else {
        decode_effective_address(words, src_mode, src_reg, Some(size))?
    };
    let dest = decode_alterable(words, dest_mode, dest_reg)?;
    inst.operands = [src, dest];
    Ok(())
}

/// line `0100`, everything that didn't fit elsewhere.
fn decode_misc<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    match (rx, opmode) {
        (0..=3, 0..=2) => {
            const OPC: [Opcode; 4] = [Opcode::NEGX, Opcode::CLR, Opcode::NEG, Opcode::NOT];
            inst.opcode = OPC[rx as usize];
            inst.size = Size::from_bits(opmode);
            inst.operands[0] = decode_data_alterable(words, mode, reg)?;
            return Ok(());
        }
        (0, 3) => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [Operand::StatusRegister, decode_data_alterable(words, mode, reg)?];
            return Ok(());
        }
        (1, 3) => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [Operand::ConditionCodes, decode_data_alterable(words, mode, reg)?];
            return Ok(());
        }
        (2, 3) => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [decode_data(words, mode, reg, Size::Word)?, Operand::ConditionCodes];
            return Ok(());
        }
        (3, 3) => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [decode_data(words, mode, reg, Size::Word)?, Operand::StatusRegister];
            return Ok(());
        }
        (4, 0) => {
            inst.opcode = Opcode::NBCD;
            inst.operands[0] = decode_data_alterable(words, mode, reg)?;
            return Ok(());
        }
        (4, 1) => {
            if mode == 0 {
                inst.opcode = Opcode::SWAP;
                inst.operands[0] = Operand::DataRegister(reg);
            } else {
                // `0x4848..=0x484f` is `BKPT` on later parts
                inst.opcode = Opcode::PEA;
                inst.operands[0] = decode_control(words, mode, reg)?;
            }
            return Ok(());
        }
        (4, 2) | (4, 3) if mode == 0 => {
            inst.opcode = Opcode::EXT;
            inst.size = Some(if opmode == 2 { Size::Word } else { Size::Long });
            inst.operands[0] = Operand::DataRegister(reg);
            return Ok(());
        }
        (5, 0..=2) => {
            // pc-relative and immediate operands are 68020 additions
            inst.opcode = Opcode::TST;
            inst.size = Size::from_bits(opmode);
            inst.operands[0] = decode_data_alterable(words, mode, reg)?;
            return Ok(());
        }
        (5, 3) => {
            if word == 0x4afc {
                inst.opcode = Opcode::ILLEGAL;
            } else {
                inst.opcode = Opcode::TAS;
                inst.operands[0] = decode_data_alterable(words, mode, reg)?;
            }
            return Ok(());
        }
        (7, 1) => {
            return decode_misc_control(inst, word, words);
        }
        (7, 2) => {
            inst.opcode = Opcode::JSR;
            inst.operands[0] = decode_control(words, mode, reg)?;
            return Ok(());
        }
        (7, 3) => {
            inst.opcode = Opcode::JMP;
            inst.operands[0] = decode_control(words, mode, reg)?;
            return Ok(());
        }
        _ => {}
    }

    if (rx == 4 || rx == 6) && (opmode == 2 || opmode == 3) {
        return decode_movem(inst, word, words);
    }

    if opmode == 0b111 {
        inst.opcode = Opcode::LEA;
        inst.operands = [
            decode_control(words, mode, reg)?,
            Operand::AddressRegister(rx),
        ];
        return Ok(());
    }

    if opmode == 0b110 {
        inst.opcode = Opcode::CHK;
        inst.size = Some(Size::Word);
        inst.operands = [
            decode_data(words, mode, reg, Size::Word)?,
            Operand::DataRegister(rx),
        ];
        return Ok(());
    }

    Err(DecodeError::UnknownInstruction)
}

/// `0100 1110 01xx xxxx`: traps, frames, `USP` moves, and the zero-operand control instructions.
fn decode_misc_control<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let reg = (word & 0b111) as u8;

    match (word >> 3) & 0b111 {
        0b000 | 0b001 => {
            inst.opcode = Opcode::TRAP;
            inst.operands[0] = Operand::Immediate((word & 0b1111) as i32);
        }
        0b010 => {
            inst.opcode = Opcode::LINK;
            inst.operands = [
                Operand::AddressRegister(reg),
                Operand::Immediate(read_immediate(words, Size::Word)?),
            ];
        }
        0b011 => {
            inst.opcode = Opcode::UNLK;
            inst.operands[0] = Operand::AddressRegister(reg);
        }
        0b100 => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [Operand::AddressRegister(reg), Operand::UserStackPointer];
        }
        0b101 => {
            inst.opcode = Opcode::MOVE;
            inst.operands = [Operand::UserStackPointer, Operand::AddressRegister(reg)];
        }
        0b110 => {
            // `0x4e74` is `RTD` on later parts
            const OPC: [Option<Opcode>; 8] = [
                Some(Opcode::RESET), Some(Opcode::NOP), Some(Opcode::STOP), Some(Opcode::RTE),
                None, Some(Opcode::RTS), Some(Opcode::TRAPV), Some(Opcode::RTR),
            ];
            inst.opcode = OPC[reg as usize].ok_or(DecodeError::UnknownInstruction)?;
            if inst.opcode == Opcode::STOP {
                inst.operands[0] = Operand::Immediate(read_immediate(words, Size::Word)?);
            }
        }
        _ => {
            // `MOVEC`, 68010 and later
            return Err(DecodeError::UnknownInstruction);
        }
    }
    Ok(())
}

/// `MOVEM`. the register mask word precedes any extension words of the effective address.
fn decode_movem<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let to_registers = word & 0x0400 != 0;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    inst.opcode = Opcode::MOVEM;
    inst.size = Some(if word & 0x0040 == 0 { Size::Word } else { Size::Long });

    let mask = words.next()?;

    if to_registers {
        let src = if mode == 3 {
            Operand::PostIncrement(reg)
        } else {
            decode_control(words, mode, reg)?
        };
        inst.operands = [src, Operand::RegisterList(mask)];
    } else if mode == 4 {
        // with predecrement the mask runs from `A7` in bit 0 up to `D0` in bit 15.
        inst.operands = [Operand::RegisterList(mask.reverse_bits()), Operand::PreDecrement(reg)];
    } else {
        if mode == 7 && (reg == 2 || reg == 3) {
            return Err(DecodeError::UnknownInstruction);
        }
        let dest = decode_control(words, mode, reg)?;
        inst.operands = [Operand::RegisterList(mask), dest];
    }
    Ok(())
}

/// line `0101`: `ADDQ`, `SUBQ`, `Scc`, `DBcc`.
fn decode_quick<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    if let Some(size) = Size::from_bits(((word >> 6) & 0b11) as u8) {
        let data = (word >> 9) & 0b111;
        let data = if data == 0 { 8 } else { data };
        inst.opcode = if word & 0x0100 == 0 {
            Opcode::ADDQ
        } else {
            Opcode::SUBQ
        };
        if size == Size::Byte && mode == 1 {
            return Err(DecodeError::UnknownInstruction);
        }
        inst.size = Some(size);
        inst.operands = [Operand::Immediate(data as i32), decode_alterable(words, mode, reg)?];
        return Ok(());
    }

    // size `0b11` selects the conditional forms
    let condition = Condition::from_bits((word >> 8) as u8);
    if mode == 0b001 {
        inst.opcode = Opcode::DBcc(condition);
        let disp = words.next()? as i16;
        inst.operands = [Operand::DataRegister(reg), Operand::Branch(disp as i32)];
    } else {
        inst.opcode = Opcode::Scc(condition);
        inst.operands[0] = decode_data_alterable(words, mode, reg)?;
    }
    Ok(())
}

/// line `0110`: `BRA`, `BSR`, `Bcc`.
fn decode_branch<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    inst.opcode = match Condition::from_bits((word >> 8) as u8) {
        Condition::T => Opcode::BRA,
        Condition::F => Opcode::BSR,
        condition => Opcode::Bcc(condition),
    };

    // a zero byte displacement means the displacement is in the following word instead
    let disp = match word as u8 {
        0 => words.next()? as i16 as i32,
        disp => disp as i8 as i32,
    };
    inst.operands[0] = Operand::Branch(disp);
    Ok(())
}

/// the `<ea>,Dn` / `Dn,<ea>` shape shared by `OR`, `AND`, `ADD`, `SUB`, and `CMP`.
///
/// `address_source` is whether word and long sources may be address registers: true for the
/// arithmetic operations, false for the logical ones.
fn decode_dn_ea<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, opcode: Opcode, address_source: bool, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    let size = Size::from_bits(opmode & 0b11).ok_or(DecodeError::UnknownInstruction)?;
    inst.opcode = opcode;
    inst.size = Some(size);

    if opmode & 0b100 == 0 {
        let src = if address_source && size != Size::Byte {
            decode_effective_address(words, mode, reg, Some(size))?
        } else {
            decode_data(words, mode, reg, size)?
        };
        inst.operands = [src, Operand::DataRegister(rx)];
    } else {
        // register-direct destinations in this half are other instructions (`ADDX`, `SBCD`,
        // ...), and anything left over is undefined.
        if mode < 2 {
            return Err(DecodeError::UnknownInstruction);
        }
        inst.operands = [
            Operand::DataRegister(rx),
            decode_data_alterable(words, mode, reg)?,
        ];
    }
    Ok(())
}

/// line `1000`: `OR`, `DIVU`, `DIVS`, `SBCD`.
fn decode_or_div<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    match opmode {
        0b011 | 0b111 => {
            inst.opcode = if opmode == 0b011 { Opcode::DIVU } else { Opcode::DIVS };
            inst.size = Some(Size::Word);
            inst.operands = [
                decode_data(words, mode, reg, Size::Word)?,
                Operand::DataRegister(rx),
            ];
            Ok(())
        }
        0b100 if mode < 2 => {
            inst.opcode = Opcode::SBCD;
            inst.operands = register_pair(word);
            Ok(())
        }
        _ => decode_dn_ea(inst, Opcode::OR, false, word, words),
    }
}

/// lines `1001` and `1101`: `SUB`/`SUBX`/`SUBA` and `ADD`/`ADDX`/`ADDA`, which are laid out
/// identically. `opcodes` is the plain, extended, and address forms in that order.
fn decode_arithmetic<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T, opcodes: [Opcode; 3]) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    if opmode & 0b11 == 0b11 {
        let size = if opmode == 0b011 { Size::Word } else { Size::Long };
        inst.opcode = opcodes[2];
        inst.size = Some(size);
        inst.operands = [
            decode_effective_address(words, mode, reg, Some(size))?,
            Operand::AddressRegister(rx),
        ];
        return Ok(());
    }

    if opmode & 0b100 != 0 && mode < 2 {
        inst.opcode = opcodes[1];
        inst.size = Size::from_bits(opmode & 0b11);
        inst.operands = register_pair(word);
        return Ok(());
    }

    decode_dn_ea(inst, opcodes[0], true, word, words)
}

/// line `1011`: `CMP`, `CMPA`, `CMPM`, `EOR`.
fn decode_cmp_eor<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    if opmode & 0b11 == 0b11 {
        let size = if opmode == 0b011 { Size::Word } else { Size::Long };
        inst.opcode = Opcode::CMPA;
        inst.size = Some(size);
        inst.operands = [
            decode_effective_address(words, mode, reg, Some(size))?,
            Operand::AddressRegister(rx),
        ];
        return Ok(());
    }

    if opmode & 0b100 == 0 {
        return decode_dn_ea(inst, Opcode::CMP, true, word, words);
    }

    inst.size = Size::from_bits(opmode & 0b11);
    if mode == 0b001 {
        inst.opcode = Opcode::CMPM;
        inst.operands = [Operand::PostIncrement(reg), Operand::PostIncrement(rx)];
    } else {
        inst.opcode = Opcode::EOR;
        inst.operands = [Operand::DataRegister(rx), decode_data_alterable(words, mode, reg)?];
    }
    Ok(())
}

/// line `1100`: `AND`, `MULU`, `MULS`, `ABCD`, `EXG`.
fn decode_and_mul<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    let rx = ((word >> 9) & 0b111) as u8;
    let opmode = ((word >> 6) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;

    match (opmode, mode) {
        (0b011, _) | (0b111, _) => {
            inst.opcode = if opmode == 0b011 { Opcode::MULU } else { Opcode::MULS };
            inst.size = Some(Size::Word);
            inst.operands = [
                decode_data(words, mode, reg, Size::Word)?,
                Operand::DataRegister(rx),
            ];
            Ok(())
        }
        (0b100, 0b000) | (0b100, 0b001) => {
            inst.opcode = Opcode::ABCD;
            inst.operands = register_pair(word);
            Ok(())
        }
        (0b101, 0b000) => {
            inst.opcode = Opcode::EXG;
            inst.operands = [Operand::DataRegister(rx), Operand::DataRegister(reg)];
            Ok(())
        }
        (0b101, 0b001) => {
            inst.opcode = Opcode::EXG;
            inst.operands = [Operand::AddressRegister(rx), Operand::AddressRegister(reg)];
            Ok(())
        }
        (0b110, 0b001) => {
            inst.opcode = Opcode::EXG;
            inst.operands = [Operand::DataRegister(rx), Operand::AddressRegister(reg)];
            Ok(())
        }
        _ => decode_dn_ea(inst, Opcode::AND, false, word, words),
    }
}

/// line `1110`: shifts and rotates, of registers or of a word in memory.
fn decode_shift<T: Reader<<M68000 as Arch>::Address, <M68000 as Arch>::Word>>(decoder: &InstDecoder, inst: &mut Instruction, word: u16, words: &mut T) -> Result<(), DecodeError> {
    // (right, left) for each shift type
    const OPC: [(Opcode, Opcode); 4] = [
        (Opcode::ASR, Opcode::ASL),
        (Opcode::LSR, Opcode::LSL),
        (Opcode::ROXR, Opcode::ROXL),
        (Opcode::ROR, Opcode::ROL),
    ];

    let rx = ((word >> 9) & 0b111) as u8;
    let mode = ((word >> 3) & 0b111) as u8;
    let reg = (word & 0b111) as u8;
    let left = word & 0x0100 != 0;
    let pick = |kind: u8| {
        let (right_op, left_op) = OPC[(kind & 0b11) as usize];
        if left { left_op } else { right_op }
    };

    match Size::from_bits(((word >> 6) & 0b11) as u8) {
        None => {
            // memory shifts are by one, on a word. `rx` bit 2 set is a bit field instruction on
            // the 68020.
            if rx & 0b100 != 0 || mode < 2 {
                return Err(DecodeError::UnknownInstruction);
            }
            inst.opcode = pick(rx);
            inst.size = Some(Size::Word);
            inst.operands[0] = decode_data_alterable(words, mode, reg)?;
        }
        Some(size) => {
            inst.opcode = pick(mode);
            inst.size = Some(size);
            let count = if word & 0x0020 == 0 {
                let count = if rx == 0 && !decoder.literal_shift_counts() { 8 } else { rx };
                Operand::Immediate(count as i32)
            } else {
                Operand::DataRegister(rx)
            };
            inst.operands = [count, Operand::DataRegister(reg)];
        }
    }
    Ok(())
}
