//! Text layout of the final assembly listing.

use std::collections::HashMap;

use crate::{
    codegen::{Item, Variable},
    instruction::Instruction,
};

pub const LABEL_WIDTH: usize = 20;
pub const CODE_WIDTH: usize = 40;
pub const DATA_WIDTH: usize = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    label: String,
    instruction: Instruction,
    note: Option<String>,
}

/// Renders the code section, a blank separator and the data section.
pub fn render(items: &[Item], variables: &[Variable]) -> String {
    let mut lines: Vec<String> = attach_labels(items)
        .iter()
        .map(|line| format!("{:<LABEL_WIDTH$}{}", line.label, annotate(&line.instruction, line.note.as_deref())))
        .collect();
    lines.push(String::new());
    lines.extend(variables.iter().map(|variable| {
        let data = format!("{} data {}", variable.name, variable.initial);
        format!("{data:<DATA_WIDTH$}; initial value")
    }));
    lines.join("\n")
}

fn annotate(instruction: &Instruction, note: Option<&str>) -> String {
    let code = instruction.to_string();
    match note {
        Some(note) => format!("{code:<CODE_WIDTH$}; {note}"),
        None => code,
    }
}

/// Gives every instruction the label that precedes it. A line holds one
/// label, so when several are pending the first one wins and jumps to the
/// rest are redirected to it.
fn attach_labels(items: &[Item]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    let mut aliases: HashMap<String, String> = HashMap::new();

    for item in items {
        match item {
            Item::Label(name) => pending.push(name.as_str()),
            Item::Code { instruction, note } => {
                let label = match pending.split_first() {
                    Some((first, rest)) => {
                        for alias in rest {
                            aliases.insert((*alias).to_string(), (*first).to_string());
                        }
                        (*first).to_string()
                    }
                    None => String::new(),
                };
                pending.clear();
                lines.push(Line {
                    label,
                    instruction: instruction.clone(),
                    note: note.clone(),
                });
            }
        }
    }

    for line in &mut lines {
        if let Some(target) = line.instruction.jump_target_mut() {
            if let Some(canonical) = aliases.get(target.as_str()) {
                *target = canonical.clone();
            }
        }
    }
    lines
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
