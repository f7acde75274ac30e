use std::fmt;

use crate::ast::{BinOp, CmpOp};

/// Highest general-purpose register. R0 always reads as zero and R15 is
/// reserved for condition codes, so neither is handed out.
pub const MAX_REGISTER: u8 = 14;

/// Literals must fit a 16-bit word, read as either signed or unsigned.
pub const WORD_RANGE: std::ops::RangeInclusive<i64> = -32768..=65535;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register(pub u8);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Lea { rd: Register, value: i64 },
    Load { rd: Register, var: String },
    Store { rs: Register, var: String },
    Arith { op: BinOp, rd: Register, ra: Register, rb: Register },
    Cmp { ra: Register, rb: Register },
    Jump { cond: Option<CmpOp>, target: String },
    Trap,
}

impl Instruction {
    pub fn jump_target_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Jump { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lea { rd, value } => write!(f, "lea {rd},{value}"),
            Self::Load { rd, var } => write!(f, "load {rd},{var}"),
            Self::Store { rs, var } => write!(f, "store {rs},{var}"),
            Self::Arith { op, rd, ra, rb } => {
                let mnemonic = match op {
                    BinOp::Add => "add",
                    BinOp::Sub => "sub",
                    BinOp::Mul => "mul",
                    BinOp::Div => "div",
                };
                write!(f, "{mnemonic} {rd},{ra},{rb}")
            }
            Self::Cmp { ra, rb } => write!(f, "cmp {ra},{rb}"),
            Self::Jump { cond: None, target } => write!(f, "jump {target}"),
            Self::Jump {
                cond: Some(cond),
                target,
            } => {
                let mnemonic = match cond {
                    CmpOp::Gt => "jumpgt",
                    CmpOp::Ge => "jumpge",
                    CmpOp::Lt => "jumplt",
                    CmpOp::Le => "jumple",
                    CmpOp::Eq => "jumpeq",
                    CmpOp::Ne => "jumpne",
                };
                write!(f, "{mnemonic} {target}")
            }
            Self::Trap => f.write_str("trap R0,R0,R0"),
        }
    }
}
