//! Lowers the syntax tree to Sigma16 instructions.
//!
//! Code is produced as a flat list of [`Item`]s in which labels are separate
//! entries. [`crate::listing`] later attaches each label to the instruction
//! that follows it.

use tracing::trace;

use crate::{
    ast::{assignment_text, BinOp, CmpOp, Compare, Expr, Operand, Program, Stmt, StmtKind},
    error::ConvertError,
    instruction::{Instruction, Register, MAX_REGISTER},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Label(String),
    Code {
        instruction: Instruction,
        note: Option<String>,
    },
}

/// A memory cell emitted in the data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub initial: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub items: Vec<Item>,
    pub variables: Vec<Variable>,
}

/// Per-statement register pool. Registers are handed out lowest first and
/// stay taken until the pool is dropped.
#[derive(Debug, Clone, Default)]
struct Registers {
    locked: u16,
}

impl Registers {
    fn allocate(&mut self, line: usize) -> Result<Register, ConvertError> {
        for index in 1..=MAX_REGISTER {
            let bit = 1u16 << index;
            if self.locked & bit == 0 {
                self.locked |= bit;
                return Ok(Register(index));
            }
        }
        Err(ConvertError::RegistersExhausted { line })
    }
}

pub fn generate(program: &Program) -> Result<Generated, ConvertError> {
    let mut generator = Generator::default();
    generator.block(&program.body, 0)?;
    generator.code(Instruction::Trap, Some("stop program".to_string()));
    Ok(Generated {
        items: generator.items,
        variables: generator.variables,
    })
}

#[derive(Default)]
struct Generator {
    items: Vec<Item>,
    variables: Vec<Variable>,
}

impl Generator {
    fn block(&mut self, body: &[Stmt], depth: usize) -> Result<(), ConvertError> {
        for stmt in body {
            self.statement(stmt, depth)?;
        }
        Ok(())
    }

    fn statement(&mut self, stmt: &Stmt, depth: usize) -> Result<(), ConvertError> {
        trace!(line = stmt.line, depth, "lowering statement");
        match &stmt.kind {
            StmtKind::Assign { targets, value } => self.assign(stmt.line, targets, value, depth),
            StmtKind::If { test, body, orelse } => {
                let true_label = format!("true{}", stmt.line);
                let done_label = format!("done{}", stmt.line);
                if orelse.is_empty() {
                    self.compare(stmt.line, test, &true_label, &done_label)?;
                    self.label(&true_label);
                    self.block(body, depth + 1)?;
                } else {
                    let else_label = format!("else{}", stmt.line);
                    self.compare(stmt.line, test, &true_label, &else_label)?;
                    self.label(&true_label);
                    self.block(body, depth + 1)?;
                    self.jump(None, &done_label);
                    self.label(&else_label);
                    self.block(orelse, depth + 1)?;
                }
                self.label(&done_label);
                Ok(())
            }
            StmtKind::While { test, body } => {
                self.looped(stmt.line, test, |generator| generator.block(body, depth + 1))
            }
            StmtKind::For {
                target,
                start,
                end,
                body,
            } => {
                let init = Expr::Operand(start.clone());
                self.assign(stmt.line, std::slice::from_ref(target), &init, depth)?;
                let test = Compare {
                    left: Operand::Name(target.clone()),
                    op: CmpOp::Lt,
                    right: end.clone(),
                };
                let step = Expr::BinOp {
                    left: Operand::Name(target.clone()),
                    op: BinOp::Add,
                    right: Operand::Int(1),
                };
                self.looped(stmt.line, &test, |generator| {
                    generator.block(body, depth + 1)?;
                    generator.assign(stmt.line, std::slice::from_ref(target), &step, depth + 1)
                })
            }
            StmtKind::Pass => Ok(()),
        }
    }

    /// `loopN: test; trueN: body; jump loopN; doneN:`
    fn looped(
        &mut self,
        line: usize,
        test: &Compare,
        body: impl FnOnce(&mut Self) -> Result<(), ConvertError>,
    ) -> Result<(), ConvertError> {
        let loop_label = format!("loop{line}");
        let true_label = format!("true{line}");
        let done_label = format!("done{line}");
        self.label(&loop_label);
        self.compare(line, test, &true_label, &done_label)?;
        self.label(&true_label);
        body(self)?;
        self.jump(None, &loop_label);
        self.label(&done_label);
        Ok(())
    }

    fn assign(
        &mut self,
        line: usize,
        targets: &[String],
        value: &Expr,
        depth: usize,
    ) -> Result<(), ConvertError> {
        for operand in value.operands() {
            self.ensure_defined(line, operand)?;
        }
        let text = assignment_text(targets, value);

        match value {
            Expr::Operand(Operand::Int(constant)) => {
                for target in targets {
                    if self.is_defined(target) {
                        self.store_constant(line, *constant, target, &text)?;
                    } else if depth == 0 {
                        self.declare(target, *constant);
                    } else {
                        self.declare(target, 0);
                        self.store_constant(line, *constant, target, &text)?;
                    }
                }
            }
            Expr::Operand(Operand::Name(source)) => {
                let register = Registers::default().allocate(line)?;
                self.code(
                    Instruction::Load {
                        rd: register,
                        var: source.clone(),
                    },
                    Some(text.clone()),
                );
                self.store_all(register, targets, &text);
            }
            Expr::BinOp { left, op, right } => {
                let mut registers = Registers::default();
                let target = registers.allocate(line)?;
                let left_register = registers.allocate(line)?;
                let right_register = registers.allocate(line)?;
                let expr_text = value.to_string();
                self.load_operand(left_register, left, Some(expr_text.clone()));
                self.load_operand(right_register, right, Some(expr_text.clone()));
                self.code(
                    Instruction::Arith {
                        op: *op,
                        rd: target,
                        ra: left_register,
                        rb: right_register,
                    },
                    Some(expr_text),
                );
                self.store_all(target, targets, &text);
            }
        }
        Ok(())
    }

    fn store_constant(
        &mut self,
        line: usize,
        constant: i64,
        target: &str,
        text: &str,
    ) -> Result<(), ConvertError> {
        let register = Registers::default().allocate(line)?;
        self.code(
            Instruction::Lea {
                rd: register,
                value: constant,
            },
            Some(text.to_string()),
        );
        self.code(
            Instruction::Store {
                rs: register,
                var: target.to_string(),
            },
            Some(text.to_string()),
        );
        Ok(())
    }

    fn store_all(&mut self, register: Register, targets: &[String], text: &str) {
        for target in targets {
            self.code(
                Instruction::Store {
                    rs: register,
                    var: target.clone(),
                },
                Some(text.to_string()),
            );
            self.declare(target, 0);
        }
    }

    fn compare(
        &mut self,
        line: usize,
        test: &Compare,
        true_label: &str,
        false_label: &str,
    ) -> Result<(), ConvertError> {
        self.ensure_defined(line, &test.left)?;
        self.ensure_defined(line, &test.right)?;
        let mut registers = Registers::default();
        let left = registers.allocate(line)?;
        let right = registers.allocate(line)?;
        self.load_operand(left, &test.left, None);
        self.load_operand(right, &test.right, None);
        self.code(Instruction::Cmp { ra: left, rb: right }, None);
        self.jump(Some(test.op), true_label);
        self.jump(None, false_label);
        Ok(())
    }

    fn load_operand(&mut self, register: Register, operand: &Operand, note: Option<String>) {
        let instruction = match operand {
            Operand::Name(name) => Instruction::Load {
                rd: register,
                var: name.clone(),
            },
            Operand::Int(value) => Instruction::Lea {
                rd: register,
                value: *value,
            },
        };
        self.code(instruction, note);
    }

    fn ensure_defined(&self, line: usize, operand: &Operand) -> Result<(), ConvertError> {
        match operand {
            Operand::Name(name) if !self.is_defined(name) => Err(ConvertError::UndefinedName {
                line,
                name: name.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn is_defined(&self, name: &str) -> bool {
        self.variables.iter().any(|variable| variable.name == name)
    }

    /// Records `name` in the data section unless it is already there.
    fn declare(&mut self, name: &str, initial: i64) {
        if !self.is_defined(name) {
            self.variables.push(Variable {
                name: name.to_string(),
                initial,
            });
        }
    }

    fn jump(&mut self, cond: Option<CmpOp>, target: &str) {
        self.code(
            Instruction::Jump {
                cond,
                target: target.to_string(),
            },
            None,
        );
    }

    fn label(&mut self, name: &str) {
        self.items.push(Item::Label(name.to_string()));
    }

    fn code(&mut self, instruction: Instruction, note: Option<String>) {
        self.items.push(Item::Code { instruction, note });
    }
}

#[cfg(test)]
#[path = "tests/codegen_tests.rs"]
mod tests;
