use super::*;

fn numbers(input: &str) -> Vec<f64> {
    let mut s = Scanner::new(input);
    let mut out = Vec::new();
    while !s.at_end() {
        out.push(s.number().unwrap());
        s.skip_comma_ws();
    }
    out
}

#[test]
fn numbers_split_on_sign_and_second_dot() {
    assert_eq!(numbers("10-5"), vec![10.0, -5.0]);
    assert_eq!(numbers("0.5.5"), vec![0.5, 0.5]);
    assert_eq!(numbers("-.5e1,+3"), vec![-5.0, 3.0]);
    assert_eq!(numbers("1e-2 4."), vec![0.01, 4.0]);
}

#[test]
fn exponent_without_digits_is_left_unconsumed() {
    let mut s = Scanner::new("2e");
    assert_eq!(s.number().unwrap(), 2.0);
    assert_eq!(s.letter(), Some(('e', 1)));
}

#[test]
fn number_errors_report_offset() {
    let mut s = Scanner::new("  x");
    match s.number() {
        Err(DrawonError::MalformedPath { offset, message, .. }) => {
            assert_eq!(offset, 2);
            assert!(message.contains("'x'"));
        }
        other => panic!("unexpected {other:?}"),
    }

    let mut s = Scanner::new("-");
    assert!(s.number().is_err());
}

#[test]
fn flags_need_no_separator() {
    let mut s = Scanner::new("0110");
    assert!(!s.flag().unwrap());
    assert!(s.flag().unwrap());
    assert_eq!(s.number().unwrap(), 10.0);

    let mut s = Scanner::new("2");
    assert!(s.flag().is_err());
}

#[test]
fn comma_is_consumed_once() {
    let mut s = Scanner::new("1 , ,2");
    assert_eq!(s.number().unwrap(), 1.0);
    s.skip_comma_ws();
    assert_eq!(s.peek(), Some(b','));
}
