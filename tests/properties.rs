use proptest::prelude::*;

use yaxpeax_arch::{Decoder, Reader};
use yaxpeax_m68000::{
    decode_effective_address, Condition, DecodeError, Disassembler, InstDecoder, M68000Reader,
    Memory, Opcode, Operand, Size,
};

const CONDITION_NAMES: [&str; 16] = [
    "T", "F", "HI", "LS", "CC", "CS", "NE", "EQ",
    "VC", "VS", "PL", "MI", "GE", "LT", "GT", "LE",
];

fn relative(disp: i32) -> String {
    if disp < 0 {
        format!("*-{}", -(disp as i64))
    } else {
        format!("*+{}", disp)
    }
}

/// what mode `mode`, register `reg` should decode to when followed by the words
/// `[0xfffe, 0x0304, ..]`, and how many bytes of extension it takes.
fn expected_ea(mode: u8, reg: u8) -> Option<(String, u32)> {
    Some(match (mode, reg) {
        (0, r) => (format!("D{}", r), 0),
        (1, r) => (format!("A{}", r), 0),
        (2, r) => (format!("(A{})", r), 0),
        (3, r) => (format!("(A{})+", r), 0),
        (4, r) => (format!("-(A{})", r), 0),
        (5, r) => (format!("(-2,A{})", r), 2),
        (6, r) => (format!("(-2,A{},X7)", r), 2),
        (7, 0) => ("(-2).W".to_owned(), 2),
        (7, 1) => ("(4294836996).L".to_owned(), 4),
        (7, 2) => ("(-2,PC)".to_owned(), 2),
        (7, 3) => ("(-2,PC,X7)".to_owned(), 2),
        (7, 4) => ("#-2".to_owned(), 2),
        _ => return None,
    })
}

#[test]
fn effective_address_modes_are_exhaustive() {
    for mode in 0..8u8 {
        for reg in 0..8u8 {
            let mut words = M68000Reader::of_u16(&[0xfffe, 0x0304, 0x0506]);
            let decoded = decode_effective_address(&mut words, mode, reg, Some(Size::Word));
            match expected_ea(mode, reg) {
                Some((text, consumed)) => {
                    let operand = decoded.unwrap();
                    assert_eq!(operand.to_string(), text, "mode {} reg {}", mode, reg);
                    assert_eq!(Reader::<u32, u16>::total_offset(&mut words), consumed);
                }
                None => {
                    assert_eq!(decoded, Err(DecodeError::UnsupportedAddressingMode), "mode {} reg {}", mode, reg);
                }
            }
        }
    }
}

#[test]
fn size_suffixes() {
    assert_eq!(Size::Byte.suffix(), "");
    assert_eq!(Size::Word.suffix(), ".W");
    assert_eq!(Size::Long.suffix(), ".L");
    assert_eq!(Size::from_bits(0b11), None);

    for (bits, suffix) in ["", ".W", ".L"].iter().enumerate() {
        let inst = InstDecoder::decode_u16(&[0xd000 | ((bits as u16) << 6)]).unwrap();
        assert_eq!(inst.to_string(), format!("ADD{} D0,D0", suffix));
    }
}

/// opcodes whose size comes from the two-bit size field.
const SIZED_OPCODES: [Opcode; 22] = [
    Opcode::ORI, Opcode::ANDI, Opcode::SUBI, Opcode::ADDI, Opcode::EORI, Opcode::CMPI,
    Opcode::NEGX, Opcode::CLR, Opcode::NEG, Opcode::NOT, Opcode::TST,
    Opcode::ADDQ, Opcode::SUBQ,
    Opcode::OR, Opcode::AND, Opcode::ADD, Opcode::SUB, Opcode::CMP, Opcode::EOR,
    Opcode::ADDX, Opcode::SUBX, Opcode::CMPM,
];

const SHIFT_OPCODES: [Opcode; 8] = [
    Opcode::ASL, Opcode::ASR, Opcode::LSL, Opcode::LSR,
    Opcode::ROXL, Opcode::ROXR, Opcode::ROL, Opcode::ROR,
];

#[test]
fn size_field_11_is_never_a_size() {
    // (mask, value) selecting each variable-size family with its size field at `11`
    const FAMILIES: [(u16, u16); 11] = [
        (0xf1c0, 0x00c0), // immediate ops
        (0xf9c0, 0x40c0), // NEGX, CLR, NEG, NOT
        (0xffc0, 0x4ac0), // TST
        (0xf0c0, 0x50c0), // ADDQ, SUBQ
        (0xf0c0, 0x80c0), // OR
        (0xf0c0, 0x90c0), // SUB, SUBX
        (0xf0c0, 0xb0c0), // CMP, EOR, CMPM
        (0xf0c0, 0xc0c0), // AND
        (0xf0c0, 0xd0c0), // ADD, ADDX
        (0xf0c0, 0xe0c0), // shifts and rotates
        (0xf0c0, 0x00c0), // the rest of line 0
    ];

    for &(mask, value) in FAMILIES.iter() {
        for word in 0..=0xffffu16 {
            if word & mask != value {
                continue;
            }
            let inst = match InstDecoder::decode_u16(&[word, 0x0000, 0x0000, 0x0000, 0x0000]) {
                Ok(inst) => inst,
                Err(_) => continue,
            };
            let opcode = inst.opcode();
            assert!(
                !SIZED_OPCODES.contains(&opcode),
                "{:04x} decoded as {} with a size field of 11", word, inst
            );
            if SHIFT_OPCODES.contains(&opcode) {
                assert_eq!(inst.size(), Some(Size::Word), "{:04x} decoded as {}", word, inst);
                assert_eq!(inst.operand_count(), 1, "{:04x} decoded as {}", word, inst);
            }
        }
    }
}

#[test]
fn conditions_in_encoding_order() {
    for (bits, name) in CONDITION_NAMES.iter().enumerate() {
        assert_eq!(Condition::from_bits(bits as u8).to_string(), *name);

        let inst = InstDecoder::decode_u16(&[0x50c0 | ((bits as u16) << 8)]).unwrap();
        assert_eq!(inst.to_string(), format!("S{} D0", name));
    }
}

proptest! {
    #[test]
    fn byte_branch_displacements_sign_extend(disp in 1u8..=255) {
        let inst = InstDecoder::decode_u16(&[0x6000 | disp as u16]).unwrap();
        let expected = if disp >= 0x80 { disp as i32 - 256 } else { disp as i32 };
        prop_assert_eq!(inst.operand(0), Operand::Branch(expected));
        prop_assert_eq!(inst.to_string(), format!("BRA {}", relative(expected)));
        prop_assert_eq!(inst.len(), 2);
    }

    #[test]
    fn word_branch_displacements_sign_extend(cond in 2u16..16, disp in any::<u16>()) {
        let inst = InstDecoder::decode_u16(&[0x6000 | (cond << 8), disp]).unwrap();
        let expected = disp as i16 as i32;
        prop_assert_eq!(
            inst.to_string(),
            format!("B{} {}", CONDITION_NAMES[cond as usize], relative(expected))
        );
        prop_assert_eq!(inst.len(), 4);
    }

    #[test]
    fn dbcc_displacements_sign_extend(cond in 0u16..16, reg in 0u16..8, disp in any::<u16>()) {
        let inst = InstDecoder::decode_u16(&[0x50c8 | (cond << 8) | reg, disp]).unwrap();
        prop_assert_eq!(
            inst.to_string(),
            format!("DB{} D{},{}", CONDITION_NAMES[cond as usize], reg, relative(disp as i16 as i32))
        );
    }

    #[test]
    fn length_is_words_consumed(words in proptest::collection::vec(any::<u16>(), 5)) {
        let mut reader = M68000Reader::of_u16(&words);
        if let Ok(inst) = InstDecoder::default().decode(&mut reader) {
            prop_assert_eq!(inst.len() as u32, Reader::<u32, u16>::total_offset(&mut reader));
            prop_assert!(inst.len() >= 2 && inst.len() <= 10);
        }
    }

    #[test]
    fn disassembler_cursor_advances_by_length(
        words in proptest::collection::vec(any::<u16>(), 5),
        base in (0u32..0x0100_0000).prop_map(|a| a & !1),
    ) {
        let mut bytes = Vec::new();
        for word in words.iter() {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        let memory = Memory::from_bytes(&bytes, base);
        let mut dis = Disassembler::new(&memory);

        let expected = InstDecoder::decode_u16(&words);
        match dis.decode_instruction(None) {
            Ok(inst) => {
                prop_assert_eq!(Ok(inst), expected);
                prop_assert_eq!(dis.cursor(), base + inst.len() as u32);
            }
            Err(e) => {
                prop_assert_eq!(Err(e), expected);
                prop_assert_eq!(dis.cursor(), base);
            }
        }
    }
}
