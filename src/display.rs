use core::fmt;

use crate::{Condition, Instruction, Opcode, Operand};

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode)?;
        if let Some(size) = self.size {
            f.write_str(size.suffix())?;
        }

        for i in 0..self.operand_count() {
            if i == 0 {
                f.write_str(" ")?;
            } else {
                f.write_str(",")?;
            }
            write!(f, "{}", self.operands[i as usize])?;
        }
        Ok(())
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <Operand as fmt::Display>::fmt(self, f)
    }
}

const REGISTER_NAMES: [&str; 16] = [
    "D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7",
    "A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7",
];

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use crate::Operand::*;
        match self {
            Nothing => f.write_str("BUG"),
            DataRegister(n) => write!(f, "D{}", n),
            AddressRegister(n) => write!(f, "A{}", n),
            Indirect(n) => write!(f, "(A{})", n),
            PostIncrement(n) => write!(f, "(A{})+", n),
            PreDecrement(n) => write!(f, "-(A{})", n),
            Displacement(n, disp) => write!(f, "({},A{})", disp, n),
            Indexed(n, index, disp) => write!(f, "({},A{},X{})", disp, n, index),
            AbsoluteShort(addr) => write!(f, "({}).W", addr),
            AbsoluteLong(addr) => write!(f, "({}).L", addr),
            PcDisplacement(disp) => write!(f, "({},PC)", disp),
            PcIndexed(index, disp) => write!(f, "({},PC,X{})", disp, index),
            Immediate(value) => write!(f, "#{}", value),
            Branch(disp) => {
                if *disp < 0 {
                    write!(f, "*-{}", -(*disp as i64))
                } else {
                    write!(f, "*+{}", disp)
                }
            }
            RegisterList(mask) => {
                if *mask == 0 {
                    return f.write_str("#0");
                }
                let mut first = true;
                for (i, name) in REGISTER_NAMES.iter().enumerate() {
                    if *mask & (1u16 << i) == 0 {
                        continue;
                    }
                    if !first {
                        f.write_str("/")?;
                    }
                    f.write_str(name)?;
                    first = false;
                }
                Ok(())
            }
            StatusRegister => f.write_str("SR"),
            ConditionCodes => f.write_str("CCR"),
            UserStackPointer => f.write_str("USP"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Condition::T => "T",
            Condition::F => "F",
            Condition::HI => "HI",
            Condition::LS => "LS",
            Condition::CC => "CC",
            Condition::CS => "CS",
            Condition::NE => "NE",
            Condition::EQ => "EQ",
            Condition::VC => "VC",
            Condition::VS => "VS",
            Condition::PL => "PL",
            Condition::MI => "MI",
            Condition::GE => "GE",
            Condition::LT => "LT",
            Condition::GT => "GT",
            Condition::LE => "LE",
        })
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        <Opcode as fmt::Display>::fmt(self, f)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Opcode::Scc(cond) => return write!(f, "S{}", cond),
            Opcode::DBcc(cond) => return write!(f, "DB{}", cond),
            Opcode::Bcc(cond) => return write!(f, "B{}", cond),
            Opcode::ORI => "ORI",
            Opcode::ANDI => "ANDI",
            Opcode::SUBI => "SUBI",
            Opcode::ADDI => "ADDI",
            Opcode::EORI => "EORI",
            Opcode::CMPI => "CMPI",
            Opcode::BTST => "BTST",
            Opcode::BCHG => "BCHG",
            Opcode::BCLR => "BCLR",
            Opcode::BSET => "BSET",
            Opcode::MOVEP => "MOVEP",
            Opcode::MOVE => "MOVE",
            Opcode::MOVEA => "MOVEA",
            Opcode::NEGX => "NEGX",
            Opcode::CLR => "CLR",
            Opcode::NEG => "NEG",
            Opcode::NOT => "NOT",
            Opcode::NBCD => "NBCD",
            Opcode::SWAP => "SWAP",
            Opcode::PEA => "PEA",
            Opcode::EXT => "EXT",
            Opcode::MOVEM => "MOVEM",
            Opcode::TST => "TST",
            Opcode::TAS => "TAS",
            Opcode::ILLEGAL => "ILLEGAL",
            Opcode::TRAP => "TRAP",
            Opcode::LINK => "LINK",
            Opcode::UNLK => "UNLK",
            Opcode::RESET => "RESET",
            Opcode::NOP => "NOP",
            Opcode::STOP => "STOP",
            Opcode::RTE => "RTE",
            Opcode::RTS => "RTS",
            Opcode::TRAPV => "TRAPV",
            Opcode::RTR => "RTR",
            Opcode::JSR => "JSR",
            Opcode::JMP => "JMP",
            Opcode::LEA => "LEA",
            Opcode::CHK => "CHK",
            Opcode::ADDQ => "ADDQ",
            Opcode::SUBQ => "SUBQ",
            Opcode::BRA => "BRA",
            Opcode::BSR => "BSR",
            Opcode::MOVEQ => "MOVEQ",
            Opcode::DIVU => "DIVU",
            Opcode::DIVS => "DIVS",
            Opcode::SBCD => "SBCD",
            Opcode::OR => "OR",
            Opcode::SUB => "SUB",
            Opcode::SUBX => "SUBX",
            Opcode::SUBA => "SUBA",
            Opcode::CMP => "CMP",
            Opcode::CMPA => "CMPA",
            Opcode::CMPM => "CMPM",
            Opcode::EOR => "EOR",
            Opcode::MULU => "MULU",
            Opcode::MULS => "MULS",
            Opcode::ABCD => "ABCD",
            Opcode::EXG => "EXG",
            Opcode::AND => "AND",
            Opcode::ADD => "ADD",
            Opcode::ADDX => "ADDX",
            Opcode::ADDA => "ADDA",
            Opcode::ASL => "ASL",
            Opcode::ASR => "ASR",
            Opcode::LSL => "LSL",
            Opcode::LSR => "LSR",
            Opcode::ROXL => "ROXL",
            Opcode::ROXR => "ROXR",
            Opcode::ROL => "ROL",
            Opcode::ROR => "ROR",
        };
        f.write_str(name)
    }
}
