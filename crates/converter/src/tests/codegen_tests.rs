use super::*;
use crate::parser::parse;

fn lower(source: &str) -> Generated {
    generate(&parse(source).expect("parse")).expect("generate")
}

fn instructions(generated: &Generated) -> Vec<String> {
    generated
        .items
        .iter()
        .map(|item| match item {
            Item::Label(name) => format!("{name}:"),
            Item::Code { instruction, .. } => instruction.to_string(),
        })
        .collect()
}

#[test]
fn registers_are_allocated_lowest_first_and_exhaust() {
    let mut registers = Registers::default();
    let handed_out: Vec<u8> = (0..MAX_REGISTER)
        .map(|_| registers.allocate(1).expect("register").0)
        .collect();
    assert_eq!(handed_out, (1..=MAX_REGISTER).collect::<Vec<_>>());
    assert_eq!(
        registers.allocate(9),
        Err(ConvertError::RegistersExhausted { line: 9 })
    );
}

#[test]
fn data_section_keeps_first_assignment_order() {
    let generated = lower("b = 2\na = 1\nc = a + b\nb = 7");
    let names: Vec<(&str, i64)> = generated
        .variables
        .iter()
        .map(|variable| (variable.name.as_str(), variable.initial))
        .collect();
    assert_eq!(names, vec![("b", 2), ("a", 1), ("c", 0)]);
}

#[test]
fn constant_first_assigned_inside_a_block_is_stored_every_time() {
    let generated = lower("i = 0\nwhile i < 3:\n    t = 5\n    i = i + 1");
    assert!(instructions(&generated).contains(&"lea R1,5".to_string()));
    let t = generated
        .variables
        .iter()
        .find(|variable| variable.name == "t")
        .expect("t declared");
    assert_eq!(t.initial, 0);
}

#[test]
fn copying_a_variable_loads_then_stores() {
    let generated = lower("a = 3\nb = a");
    assert_eq!(
        instructions(&generated),
        vec!["load R1,a", "store R1,b", "trap R0,R0,R0"]
    );
}

#[test]
fn chained_assignment_stores_each_target() {
    let generated = lower("a = 1\nb = 2\na = b = a + 1");
    assert_eq!(
        instructions(&generated)[..5],
        ["load R2,a", "lea R3,1", "add R1,R2,R3", "store R1,a", "store R1,b"]
    );
}

#[test]
fn equality_comparisons_use_jumpeq_and_jumpne() {
    let generated = lower("a = 1\nif a == 1:\n    a = 2\nif a != 2:\n    a = 3");
    let code = instructions(&generated);
    assert!(code.contains(&"jumpeq true2".to_string()));
    assert!(code.contains(&"jumpne true4".to_string()));
}

#[test]
fn if_else_layout() {
    let generated = lower("a = 1\nif a < 0:\n    a = 0\nelse:\n    pass");
    assert_eq!(
        instructions(&generated),
        vec![
            "load R1,a",
            "lea R2,0",
            "cmp R1,R2",
            "jumplt true2",
            "jump else2",
            "true2:",
            "lea R1,0",
            "store R1,a",
            "jump done2",
            "else2:",
            "done2:",
            "trap R0,R0,R0",
        ]
    );
}

#[test]
fn for_loop_with_variable_bounds() {
    let generated = lower("n = 4\ns = 0\nfor i in range(n):\n    s = s + i");
    let code = instructions(&generated);
    assert_eq!(code[0], "loop3:");
    assert_eq!(code[2], "load R2,n");
    let i = generated
        .variables
        .iter()
        .find(|variable| variable.name == "i")
        .expect("i declared");
    assert_eq!(i.initial, 0);
}

#[test]
fn nested_for_resets_its_counter() {
    let generated = lower("s = 0\nfor i in range(2):\n    for j in range(3):\n        s = s + j");
    let code = instructions(&generated);
    let reset = code
        .iter()
        .position(|line| line == "store R1,j")
        .expect("j reset inside outer loop");
    assert_eq!(code[reset - 1], "lea R1,0");
}

#[test]
fn reading_an_unassigned_name_fails() {
    let err = generate(&parse("a = 1\nb = a + c").expect("parse")).expect_err("undefined");
    assert_eq!(
        err,
        ConvertError::UndefinedName {
            line: 2,
            name: "c".into()
        }
    );
    let err = generate(&parse("while x < 3:\n    pass").expect("parse")).expect_err("undefined");
    assert_eq!(err.line(), 1);
}

#[test]
fn binop_lines_are_annotated_with_expression_text() {
    let generated = lower("a = 1\nb = a - 1");
    let notes: Vec<Option<&str>> = generated
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Code { note, .. } => Some(note.as_deref()),
            Item::Label(_) => None,
        })
        .collect();
    assert_eq!(
        notes,
        vec![
            Some("a - 1"),
            Some("a - 1"),
            Some("a - 1"),
            Some("b = a - 1"),
            Some("stop program"),
        ]
    );
}
