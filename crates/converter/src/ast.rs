//! Syntax tree for the accepted Python subset.
//!
//! `Display` renders nodes back to canonical source text. The listing uses it
//! to annotate the instructions generated for a statement.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StmtKind {
    Assign {
        targets: Vec<String>,
        value: Expr,
    },
    If {
        test: Compare,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    While {
        test: Compare,
        body: Vec<Stmt>,
    },
    For {
        target: String,
        start: Operand,
        end: Operand,
        body: Vec<Stmt>,
    },
    Pass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Name(String),
    Int(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Operand(Operand),
    BinOp {
        left: Operand,
        op: BinOp,
        right: Operand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compare {
    pub left: Operand,
    pub op: CmpOp,
    pub right: Operand,
}

impl Expr {
    pub fn operands(&self) -> Vec<&Operand> {
        match self {
            Self::Operand(operand) => vec![operand],
            Self::BinOp { left, right, .. } => vec![left, right],
        }
    }
}

/// Source text of `targets = value`, e.g. `a = b = 5`.
pub fn assignment_text(targets: &[String], value: &Expr) -> String {
    let mut text = String::new();
    for target in targets {
        text.push_str(target);
        text.push_str(" = ");
    }
    text.push_str(&value.to_string());
    text
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand(operand) => write!(f, "{operand}"),
            Self::BinOp { left, op, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        })
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}
