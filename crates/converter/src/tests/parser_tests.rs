use super::*;

fn single(source: &str) -> StmtKind {
    let mut program = parse(source).expect("parse");
    assert_eq!(program.body.len(), 1);
    program.body.remove(0).kind
}

#[test]
fn parses_chained_assignment() {
    assert_eq!(
        single("a = b = 5"),
        StmtKind::Assign {
            targets: vec!["a".into(), "b".into()],
            value: Expr::Operand(Operand::Int(5)),
        }
    );
}

#[test]
fn parses_binary_operation() {
    assert_eq!(
        single("c = a * 3"),
        StmtKind::Assign {
            targets: vec!["c".into()],
            value: Expr::BinOp {
                left: Operand::Name("a".into()),
                op: BinOp::Mul,
                right: Operand::Int(3),
            },
        }
    );
}

#[test]
fn parses_negative_literal() {
    assert_eq!(
        single("a = -4"),
        StmtKind::Assign {
            targets: vec!["a".into()],
            value: Expr::Operand(Operand::Int(-4)),
        }
    );
}

#[test]
fn elif_becomes_nested_if_in_else_branch() {
    let StmtKind::If { orelse, .. } = single("if a > 1:\n    b = 1\nelif a > 0:\n    b = 2\nelse:\n    b = 3")
    else {
        panic!("expected if");
    };
    assert_eq!(orelse.len(), 1);
    assert_eq!(orelse[0].line, 3);
    let StmtKind::If { test, orelse, .. } = &orelse[0].kind else {
        panic!("expected nested if");
    };
    assert_eq!(test.op, CmpOp::Gt);
    assert_eq!(orelse.len(), 1);
    assert_eq!(orelse[0].line, 6);
}

#[test]
fn single_argument_range_starts_at_zero() {
    assert_eq!(
        single("for i in range(n):\n    pass"),
        StmtKind::For {
            target: "i".into(),
            start: Operand::Int(0),
            end: Operand::Name("n".into()),
            body: vec![Stmt {
                line: 2,
                kind: StmtKind::Pass,
            }],
        }
    );
}

#[test]
fn accepts_body_on_the_same_line() {
    let StmtKind::While { body, .. } = single("while i < 3: i = i + 1") else {
        panic!("expected while");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].line, 1);
}

#[test]
fn statement_lines_follow_source() {
    let program = parse("a = 1\n\n# note\nb = 2").expect("parse");
    let lines: Vec<usize> = program.body.iter().map(|stmt| stmt.line).collect();
    assert_eq!(lines, vec![1, 4]);
}

#[test]
fn rejects_unsupported_constructs() {
    let cases = [
        ("a = 1 + 2 + 3", "an expression with more than one operator"),
        ("if 1 < a < 3:\n    pass", "a chained comparison"),
        ("print(a)", "calling 'print'"),
        ("a += 1", "augmented assignment"),
        ("for i in range(0, 10, 2):\n    pass", "range() with a step"),
        ("for c in word:\n    pass", "iteration over anything other than range()"),
        ("def f():\n    pass", "the 'def' statement"),
        ("if a:\n    pass", "a condition without a comparison"),
        ("a", "an expression statement"),
        ("a = (1)", "a parenthesised expression"),
        ("a = -b", "unary minus on a variable"),
    ];
    for (source, construct) in cases {
        match parse(source) {
            Err(ConvertError::Unsupported {
                construct: found, ..
            }) => assert_eq!(found, construct, "source: {source}"),
            other => panic!("source {source:?} gave {other:?}"),
        }
    }
}

#[test]
fn rejects_missing_block() {
    let err = parse("if a > 1:\nb = 2").expect_err("missing block");
    assert!(matches!(err, ConvertError::Indentation { line: 2, .. }));
}

#[test]
fn rejects_unexpected_indent() {
    let err = parse("a = 1\n    b = 2").expect_err("stray indent");
    assert!(matches!(err, ConvertError::Indentation { line: 2, .. }));
}

#[test]
fn rejects_else_without_if() {
    let err = parse("else:\n    pass").expect_err("stray else");
    assert!(matches!(err, ConvertError::Syntax { line: 1, .. }));
}

#[test]
fn rejects_assignment_in_condition() {
    let err = parse("if a = 1:\n    pass").expect_err("assignment in condition");
    assert!(matches!(err, ConvertError::Syntax { .. }));
}

#[test]
fn literals_must_fit_a_word() {
    assert!(parse("a = 65535\nb = -32768").is_ok());
    for source in ["a = 1\na = 100000", "a = -32769", "for i in range(70000):\n    pass"] {
        match parse(source) {
            Err(ConvertError::Unsupported { construct, .. }) => {
                assert_eq!(construct, "integer literal outside the 16-bit range", "{source}")
            }
            other => panic!("source {source:?} gave {other:?}"),
        }
    }
    let err = parse("a = 1\na = 100000").expect_err("too wide");
    assert_eq!(err.line(), 2);
}
