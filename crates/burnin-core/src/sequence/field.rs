use std::fmt;

use serde_json::Value;

use super::timecode::TimecodeError;

/// Loosely-typed input that may be read as an integer.
///
/// Floats are truncated toward zero, strings are parsed after trimming
/// whitespace. Booleans, nulls, arrays and objects have no integer reading.
pub trait CoerceInt: fmt::Debug {
    fn coerce_int(&self) -> Option<i128>;
}

macro_rules! coerce_integer {
    ($($t:ty),*) => {
        $(
            impl CoerceInt for $t {
                fn coerce_int(&self) -> Option<i128> {
                    Some(*self as i128)
                }
            }
        )*
    };
}

coerce_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl CoerceInt for f64 {
    fn coerce_int(&self) -> Option<i128> {
        self.is_finite().then(|| self.trunc() as i128)
    }
}

impl CoerceInt for f32 {
    fn coerce_int(&self) -> Option<i128> {
        f64::from(*self).coerce_int()
    }
}

impl CoerceInt for str {
    fn coerce_int(&self) -> Option<i128> {
        self.trim().parse().ok()
    }
}

impl CoerceInt for String {
    fn coerce_int(&self) -> Option<i128> {
        self.as_str().coerce_int()
    }
}

impl CoerceInt for Value {
    fn coerce_int(&self) -> Option<i128> {
        match self {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    Some(i128::from(u))
                } else {
                    n.as_f64().and_then(|f| f.coerce_int())
                }
            }
            Value::String(s) => s.coerce_int(),
            _ => None,
        }
    }
}

impl<T: CoerceInt + ?Sized> CoerceInt for &T {
    fn coerce_int(&self) -> Option<i128> {
        (**self).coerce_int()
    }
}

/// An input after coercion, keeping its original text for error reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    value: Option<i128>,
    input: String,
}

impl Candidate {
    pub fn of<T: CoerceInt + ?Sized>(input: &T) -> Self {
        Self {
            value: input.coerce_int(),
            input: format!("{input:?}"),
        }
    }

    /// The integer reading, or a conversion error attributed to `field`.
    pub fn value(&self, field: &'static str) -> Result<i128, TimecodeError> {
        self.value.ok_or_else(|| TimecodeError::TypeConversion {
            field,
            input: self.input.clone(),
        })
    }
}

/// An integer field with an inclusive valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedField {
    pub name: &'static str,
    pub lower: u8,
    pub upper: u8,
}

impl BoundedField {
    pub const fn new(name: &'static str, lower: u8, upper: u8) -> Self {
        Self { name, lower, upper }
    }

    /// Coerce and range-check a single input.
    pub fn validate<T: CoerceInt + ?Sized>(&self, input: &T) -> Result<u8, TimecodeError> {
        self.check(&Candidate::of(input))
    }

    pub fn check(&self, candidate: &Candidate) -> Result<u8, TimecodeError> {
        let value = candidate.value(self.name)?;
        if value < i128::from(self.lower) || value > i128::from(self.upper) {
            return Err(TimecodeError::Range {
                field: self.name,
                lower: self.lower,
                upper: self.upper,
                value,
            });
        }
        Ok(value as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MINUTE: BoundedField = BoundedField::new("minute", 0, 59);

    #[test]
    fn coerces_common_inputs() {
        assert_eq!(12u8.coerce_int(), Some(12));
        assert_eq!((-3i64).coerce_int(), Some(-3));
        assert_eq!(u64::MAX.coerce_int(), Some(u64::MAX as i128));
        assert_eq!(7.9f64.coerce_int(), Some(7));
        assert_eq!((-7.9f32).coerce_int(), Some(-7));
        assert_eq!(" 42 ".coerce_int(), Some(42));
        assert_eq!(String::from("+5").coerce_int(), Some(5));
        assert_eq!(json!(30).coerce_int(), Some(30));
        assert_eq!(json!("25").coerce_int(), Some(25));
        assert_eq!(json!(2.5).coerce_int(), Some(2));
    }

    #[test]
    fn rejects_non_numeric_inputs() {
        assert_eq!("twelve".coerce_int(), None);
        assert_eq!("1.5".coerce_int(), None);
        assert_eq!(f64::NAN.coerce_int(), None);
        assert_eq!(f64::INFINITY.coerce_int(), None);
        assert_eq!(json!(null).coerce_int(), None);
        assert_eq!(json!(true).coerce_int(), None);
        assert_eq!(json!([1]).coerce_int(), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(MINUTE.validate(&0), Ok(0));
        assert_eq!(MINUTE.validate(&59), Ok(59));
        assert_eq!(
            MINUTE.validate(&60),
            Err(TimecodeError::Range {
                field: "minute",
                lower: 0,
                upper: 59,
                value: 60
            })
        );
        assert!(matches!(
            MINUTE.validate(&-1),
            Err(TimecodeError::Range { value: -1, .. })
        ));
    }

    #[test]
    fn conversion_error_names_field_and_input() {
        let err = MINUTE.validate("soon").unwrap_err();
        assert_eq!(
            err,
            TimecodeError::TypeConversion {
                field: "minute",
                input: "\"soon\"".to_string()
            }
        );
        assert_eq!(err.to_string(), "minute must be an integer, got \"soon\"");
    }
}
