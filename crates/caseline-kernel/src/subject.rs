//! Subjects: values a matcher can switch on.
//!
//! Literal cases compare with SameValueZero: two values are the same when
//! they are identical, or when both are NaN. Signed zeros compare equal.
//! Pattern cases test a regular expression against the subject's match text.

use serde_json::{Number, Value};
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

/// A value that literal and pattern cases can be tested against.
pub trait Subject {
    /// SameValueZero equality.
    fn same_value_zero(&self, other: &Self) -> bool;

    /// The string form pattern cases are matched against.
    fn match_text(&self) -> Cow<'_, str>;
}

/// Free-standing SameValueZero check.
pub fn same_value_zero<T: Subject + ?Sized>(left: &T, right: &T) -> bool {
    left.same_value_zero(right)
}

macro_rules! exact_subject {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Subject for $ty {
                fn same_value_zero(&self, other: &Self) -> bool {
                    self == other
                }

                fn match_text(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

exact_subject!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, bool, char,
);

macro_rules! float_subject {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Subject for $ty {
                fn same_value_zero(&self, other: &Self) -> bool {
                    self == other || (self.is_nan() && other.is_nan())
                }

                fn match_text(&self) -> Cow<'_, str> {
                    Cow::Owned(float_text(f64::from(*self)))
                }
            }
        )*
    };
}

float_subject!(f32, f64);

/// Number-to-text in the usual scripting form: shortest round-trip digits,
/// plain decimals for exponents in `-7..21`, `1e+21` / `1.5e-7` outside.
fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let count = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;

    let body = if count <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - count) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    };

    if value < 0.0 { format!("-{body}") } else { body }
}

macro_rules! str_subject {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Subject for $ty {
                fn same_value_zero(&self, other: &Self) -> bool {
                    **self == **other
                }

                fn match_text(&self) -> Cow<'_, str> {
                    Cow::Borrowed(&**self)
                }
            }
        )*
    };
}

str_subject!(&str, Box<str>, Arc<str>, Rc<str>);

impl Subject for String {
    fn same_value_zero(&self, other: &Self) -> bool {
        self == other
    }

    fn match_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

/// `None` renders as `null` and only equals `None`.
impl<S: Subject> Subject for Option<S> {
    fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(left), Some(right)) => left.same_value_zero(right),
            (None, None) => true,
            _ => false,
        }
    }

    fn match_text(&self) -> Cow<'_, str> {
        match self {
            Some(inner) => inner.match_text(),
            None => Cow::Borrowed("null"),
        }
    }
}

/// JSON values compare structurally, with numbers compared by magnitude so
/// that `5` and `5.0` are the same value. Strings match unquoted; every
/// other value matches its compact JSON rendering.
impl Subject for Value {
    fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
            (Value::Array(left), Value::Array(right)) => {
                left.len() == right.len()
                    && left
                        .iter()
                        .zip(right)
                        .all(|(l, r)| l.same_value_zero(r))
            }
            (Value::Object(left), Value::Object(right)) => {
                left.len() == right.len()
                    && left.iter().all(|(key, l)| {
                        right.get(key).is_some_and(|r| l.same_value_zero(r))
                    })
            }
            _ => self == other,
        }
    }

    fn match_text(&self) -> Cow<'_, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s.as_str()),
            Value::Number(n) => match n.as_f64() {
                Some(f) if n.is_f64() => Cow::Owned(float_text(f)),
                _ => Cow::Owned(n.to_string()),
            },
            other => Cow::Owned(other.to_string()),
        }
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(l), Some(r)) = (left.as_i64(), right.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (left.as_u64(), right.as_u64()) {
        return l == r;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_values_are_same() {
        assert!(same_value_zero(&"foo", &"foo"));
        assert!(!same_value_zero(&"foo", &"bar"));
        assert!(same_value_zero(&0_i64, &0_i64));
    }

    #[test]
    fn nan_is_same_as_nan() {
        assert!(same_value_zero(&f64::NAN, &f64::NAN));
        assert!(same_value_zero(&f32::NAN, &f32::NAN));
        assert!(!same_value_zero(&f64::NAN, &12.0));
    }

    #[test]
    fn signed_zeros_are_same() {
        assert!(same_value_zero(&0.0_f64, &-0.0_f64));
        assert_eq!((-0.0_f64).match_text(), "0");
    }

    #[test]
    fn float_text_follows_number_rendering() {
        assert_eq!(5.0_f64.match_text(), "5");
        assert_eq!(2.5_f64.match_text(), "2.5");
        assert_eq!(f64::INFINITY.match_text(), "Infinity");
        assert_eq!(f64::NAN.match_text(), "NaN");
    }

    #[test]
    fn float_text_switches_to_exponent_form_at_the_edges() {
        assert_eq!(1e21_f64.match_text(), "1e+21");
        assert_eq!(1e20_f64.match_text(), "100000000000000000000");
        assert_eq!(1.5e-7_f64.match_text(), "1.5e-7");
        assert_eq!(1e-7_f64.match_text(), "1e-7");
        assert_eq!(1e-6_f64.match_text(), "0.000001");
        assert_eq!((-2.5e25_f64).match_text(), "-2.5e+25");
        assert_eq!(123.456_f64.match_text(), "123.456");
        assert_eq!((-0.001_f64).match_text(), "-0.001");
        assert_eq!(json!(1e21).match_text(), "1e+21");
    }

    #[test]
    fn json_numbers_compare_by_magnitude() {
        assert!(json!(5).same_value_zero(&json!(5.0)));
        assert!(!json!(5).same_value_zero(&json!(-5)));
        assert!(json!({"a": [1, 2.0]}).same_value_zero(&json!({"a": [1.0, 2]})));
        assert!(!json!("5").same_value_zero(&json!(5)));
    }

    #[test]
    fn json_match_text_is_unquoted_for_strings() {
        assert_eq!(json!("apple").match_text(), "apple");
        assert_eq!(json!(42).match_text(), "42");
        assert_eq!(json!(null).match_text(), "null");
        assert_eq!(json!([1, 2]).match_text(), "[1,2]");
    }

    #[test]
    fn option_subjects() {
        assert!(Some(3_u8).same_value_zero(&Some(3)));
        assert!(None::<u8>.same_value_zero(&None));
        assert!(!Some(3_u8).same_value_zero(&None));
        assert_eq!(None::<String>.match_text(), "null");
    }
}
