use converter::{convert, ConvertError};

/// Converts `code` and compares it with `expected` after dropping the
/// `; ...` annotations and trailing padding.
fn check(code: &[&str], expected: &[&str]) {
    let source = code.join("\n");
    let listing = convert(&source).expect("convert");
    let stripped: Vec<String> = listing
        .split('\n')
        .map(|line| match line.split_once(';') {
            Some((code, _)) => code.trim_end().to_string(),
            None => line.to_string(),
        })
        .collect();
    assert_eq!(stripped, expected, "full listing:\n{listing}");
}

#[test]
fn first_constant_assignment_becomes_initial_value() {
    check(
        &["a = 15"],
        &["                    trap R0,R0,R0", "", "a data 15"],
    );
}

#[test]
fn reassigning_a_constant_stores_it() {
    check(
        &["a = 15", "a = 19"],
        &[
            "                    lea R1,19",
            "                    store R1,a",
            "                    trap R0,R0,R0",
            "",
            "a data 15",
        ],
    );
}

#[test]
fn addition_with_names_and_literals() {
    check(
        &[
            "a = 15",
            "b = 21",
            "c = a + b",
            "d = a + c",
            "e = a + 6",
            "e = 5 + 3",
        ],
        &[
            "                    load R2,a",
            "                    load R3,b",
            "                    add R1,R2,R3",
            "                    store R1,c",
            "                    load R2,a",
            "                    load R3,c",
            "                    add R1,R2,R3",
            "                    store R1,d",
            "                    load R2,a",
            "                    lea R3,6",
            "                    add R1,R2,R3",
            "                    store R1,e",
            "                    lea R2,5",
            "                    lea R3,3",
            "                    add R1,R2,R3",
            "                    store R1,e",
            "                    trap R0,R0,R0",
            "",
            "a data 15",
            "b data 21",
            "c data 0",
            "d data 0",
            "e data 0",
        ],
    );
}

#[test]
fn comments_are_ignored() {
    check(
        &["a = 15  # set a to 15"],
        &["                    trap R0,R0,R0", "", "a data 15"],
    );
}

#[test]
fn four_arithmetic_operations() {
    check(
        &[
            "a = 3",
            "b = 4",
            "c = b - 3",
            "d = c * 5",
            "e = d + 15",
            "f = e / 5",
            "g = 40 / 5",
        ],
        &[
            "                    load R2,b",
            "                    lea R3,3",
            "                    sub R1,R2,R3",
            "                    store R1,c",
            "                    load R2,c",
            "                    lea R3,5",
            "                    mul R1,R2,R3",
            "                    store R1,d",
            "                    load R2,d",
            "                    lea R3,15",
            "                    add R1,R2,R3",
            "                    store R1,e",
            "                    load R2,e",
            "                    lea R3,5",
            "                    div R1,R2,R3",
            "                    store R1,f",
            "                    lea R2,40",
            "                    lea R3,5",
            "                    div R1,R2,R3",
            "                    store R1,g",
            "                    trap R0,R0,R0",
            "",
            "a data 3",
            "b data 4",
            "c data 0",
            "d data 0",
            "e data 0",
            "f data 0",
            "g data 0",
        ],
    );
}

#[test]
fn if_statement_jumps_over_body() {
    check(
        &["a = 4", "if a > 2:", "    a = 7"],
        &[
            "                    load R1,a",
            "                    lea R2,2",
            "                    cmp R1,R2",
            "                    jumpgt true2",
            "                    jump done2",
            "true2               lea R1,7",
            "                    store R1,a",
            "done2               trap R0,R0,R0",
            "",
            "a data 4",
        ],
    );
}

#[test]
fn if_else_branches_to_else_label() {
    check(
        &["a = 4", "b = 0", "if a >= 5:", "    b = 1", "else:", "    b = 2"],
        &[
            "                    load R1,a",
            "                    lea R2,5",
            "                    cmp R1,R2",
            "                    jumpge true3",
            "                    jump else3",
            "true3               lea R1,1",
            "                    store R1,b",
            "                    jump done3",
            "else3               lea R1,2",
            "                    store R1,b",
            "done3               trap R0,R0,R0",
            "",
            "a data 4",
            "b data 0",
        ],
    );
}

#[test]
fn while_loop_jumps_back_to_its_test() {
    check(
        &["i = 3", "v = 5", "while i < 8:", "    i = i + 1", "    v = v + i"],
        &[
            "loop3               load R1,i",
            "                    lea R2,8",
            "                    cmp R1,R2",
            "                    jumplt true3",
            "                    jump done3",
            "true3               load R2,i",
            "                    lea R3,1",
            "                    add R1,R2,R3",
            "                    store R1,i",
            "                    load R2,v",
            "                    load R3,i",
            "                    add R1,R2,R3",
            "                    store R1,v",
            "                    jump loop3",
            "done3               trap R0,R0,R0",
            "",
            "i data 3",
            "v data 5",
        ],
    );
}

#[test]
fn for_range_lowers_to_counting_while_loop() {
    check(
        &["v = 3", "for i in range(5, 20):", "    v = v + i"],
        &[
            "loop2               load R1,i",
            "                    lea R2,20",
            "                    cmp R1,R2",
            "                    jumplt true2",
            "                    jump done2",
            "true2               load R2,v",
            "                    load R3,i",
            "                    add R1,R2,R3",
            "                    store R1,v",
            "                    load R2,i",
            "                    lea R3,1",
            "                    add R1,R2,R3",
            "                    store R1,i",
            "                    jump loop2",
            "done2               trap R0,R0,R0",
            "",
            "v data 3",
            "i data 5",
        ],
    );
}

#[test]
fn nested_ifs_share_one_done_label() {
    check(
        &["a = 1", "b = 2", "if a > 0:", "    if b > 0:", "        a = 5"],
        &[
            "                    load R1,a",
            "                    lea R2,0",
            "                    cmp R1,R2",
            "                    jumpgt true3",
            "                    jump done4",
            "true3               load R1,b",
            "                    lea R2,0",
            "                    cmp R1,R2",
            "                    jumpgt true4",
            "                    jump done4",
            "true4               lea R1,5",
            "                    store R1,a",
            "done4               trap R0,R0,R0",
            "",
            "a data 1",
            "b data 2",
        ],
    );
}

#[test]
fn annotations_carry_the_python_statement() {
    let listing = convert("a = 15\nb = 21\nc = a + b").expect("convert");
    let lines: Vec<&str> = listing.split('\n').collect();
    assert_eq!(lines[0], format!("{:<20}{:<40}; a + b", "", "load R2,a"));
    assert_eq!(lines[2], format!("{:<20}{:<40}; a + b", "", "add R1,R2,R3"));
    assert_eq!(lines[3], format!("{:<20}{:<40}; c = a + b", "", "store R1,c"));
    assert_eq!(
        lines[4],
        format!("{:<20}{:<40}; stop program", "", "trap R0,R0,R0")
    );
    assert_eq!(lines[5], "");
    assert_eq!(lines[6], format!("{:<60}; initial value", "a data 15"));
}

#[test]
fn comparison_lines_are_not_annotated() {
    let listing = convert("a = 4\nif a > 2:\n    a = 7").expect("convert");
    let lines: Vec<&str> = listing.split('\n').collect();
    assert_eq!(lines[2], format!("{:<20}cmp R1,R2", ""));
    assert_eq!(lines[3], format!("{:<20}jumpgt true2", ""));
    assert_eq!(lines[5], format!("{:<20}{:<40}; a = 7", "true2", "lea R1,7"));
}

#[test]
fn program_without_variables_ends_with_blank_line() {
    let listing = convert("pass").expect("convert");
    assert_eq!(
        listing,
        format!("{:<20}{:<40}; stop program\n", "", "trap R0,R0,R0")
    );
}

#[test]
fn reports_line_of_unsupported_construct() {
    let err = convert("a = 1\nb = a + 2 * 3").expect_err("nested arithmetic");
    assert!(matches!(err, ConvertError::Unsupported { line: 2, .. }));
    assert_eq!(err.line(), 2);
}
