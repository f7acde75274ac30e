use super::*;

fn ctx() -> ApiContext {
    ApiContext {
        max_source_bytes: 64,
    }
}

#[test]
fn converts_and_lists_variables() {
    let response = convert_source(&ctx(), "a = 2\nb = a * 3").expect("convert");
    assert!(response.assembly.contains("mul R1,R2,R3"));
    assert_eq!(
        response.variables,
        vec![
            VariableSummary {
                name: "a".into(),
                initial: 2
            },
            VariableSummary {
                name: "b".into(),
                initial: 0
            },
        ]
    );
}

#[test]
fn blank_source_is_a_validation_error() {
    let err = convert_source(&ctx(), "  \n\t").expect_err("blank");
    assert!(matches!(err.code, ErrorCode::Validation));
}

#[test]
fn oversized_source_is_rejected_before_conversion() {
    let source = "a = 1\n".repeat(20);
    let err = convert_source(&ctx(), &source).expect_err("too large");
    assert!(matches!(err.code, ErrorCode::PayloadTooLarge));
    assert_eq!(err.message, "source exceeds 64 bytes");
}

#[test]
fn conversion_errors_carry_their_line() {
    let err = convert_source(&ctx(), "a = 1\nb = a ** 2").expect_err("power");
    assert!(matches!(err.code, ErrorCode::Conversion));
    assert_eq!(err.line, Some(2));
    assert!(err.message.starts_with("line 2:"));
}
