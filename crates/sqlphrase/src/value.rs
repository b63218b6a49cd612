//! Scalar values accepted by the formatter and the comparison generators.
//!
//! [`Value`] is the closed set of runtime kinds the escaping layer knows how
//! to embed. [`IntoValues`] normalizes the "one scalar or a list" call shapes
//! the builder accepts, remembering whether the input arrived as a list
//! (IN/NOT IN degrade to the equality family for scalar input, and the
//! formatter's arity rules treat a lone list argument specially).

/// A scalar input to the formatter or a comparison generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl Value {
    /// The runtime-kind candidate string fed to the cast classifier.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::UInt(_) => "integer",
            Value::Float(_) => "double",
            Value::Text(_) => "string",
        }
    }

    /// True for values that embed without quoting.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Float(_))
    }

    /// Loose text coercion, used for identifier and string substitution.
    ///
    /// `Null` collapses to the empty string and booleans coerce to `1`/`0`
    /// so they embed as SQL-friendly literals.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Int(v) => v.to_string(),
            Value::UInt(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Loose integer coercion: text parses its leading numeric prefix, other
    /// kinds convert the obvious way, everything else is 0.
    pub fn as_i64(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => *b as i64,
            Value::Int(v) => *v,
            Value::UInt(v) => i64::try_from(*v).unwrap_or(i64::MAX),
            Value::Float(v) => *v as i64,
            Value::Text(s) => leading_i64(s),
        }
    }

    /// Loose float coercion, mirroring [`Value::as_i64`].
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => *b as i64 as f64,
            Value::Int(v) => *v as f64,
            Value::UInt(v) => *v as f64,
            Value::Float(v) => *v,
            Value::Text(s) => leading_f64(s),
        }
    }
}

/// Parse the leading integer prefix of a string, `0` when there is none.
fn leading_i64(s: &str) -> i64 {
    let s = s.trim_start();
    let mut end = 0;
    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    s[..end].parse().unwrap_or(0)
}

/// Parse the leading float prefix of a string, `0.0` when there is none.
fn leading_f64(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        let ok = c.is_ascii_digit()
            || (i == 0 && (c == '-' || c == '+'))
            || (c == '.' && !seen_dot);
        if !ok {
            break;
        }
        if c == '.' {
            seen_dot = true;
        }
        end = i + c.len_utf8();
    }
    s[..end].parse().unwrap_or(0.0)
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_uint {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, isize);
impl_from_uint!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A normalized argument list plus the shape it arrived in.
#[derive(Debug, Clone, Default)]
pub struct Values {
    pub(crate) items: Vec<Value>,
    pub(crate) listed: bool,
}

impl Values {
    /// Arguments in order.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// True when the caller supplied a list rather than a lone scalar.
    pub fn is_listed(&self) -> bool {
        self.listed
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Convert an input into a [`Values`] argument list.
///
/// Scalars become single-element lists; `Vec`s, slices, and arrays are
/// remembered as lists; tuples supply several heterogeneous arguments.
pub trait IntoValues {
    fn into_values(self) -> Values;
}

impl IntoValues for Values {
    fn into_values(self) -> Values {
        self
    }
}

impl IntoValues for Value {
    fn into_values(self) -> Values {
        Values {
            items: vec![self],
            listed: false,
        }
    }
}

macro_rules! impl_into_values_scalar {
    ($($t:ty),*) => {
        $(impl IntoValues for $t {
            fn into_values(self) -> Values {
                Values {
                    items: vec![self.into()],
                    listed: false,
                }
            }
        })*
    };
}

impl_into_values_scalar!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, &str, String
);

impl<T: Into<Value>> IntoValues for Option<T> {
    fn into_values(self) -> Values {
        Values {
            items: vec![self.into()],
            listed: false,
        }
    }
}

impl<T: Into<Value>> IntoValues for Vec<T> {
    fn into_values(self) -> Values {
        Values {
            items: self.into_iter().map(Into::into).collect(),
            listed: true,
        }
    }
}

impl<T: Into<Value> + Clone> IntoValues for &[T] {
    fn into_values(self) -> Values {
        Values {
            items: self.iter().cloned().map(Into::into).collect(),
            listed: true,
        }
    }
}

impl<T: Into<Value>, const N: usize> IntoValues for [T; N] {
    fn into_values(self) -> Values {
        Values {
            items: self.into_iter().map(Into::into).collect(),
            listed: true,
        }
    }
}

impl IntoValues for () {
    fn into_values(self) -> Values {
        Values::default()
    }
}

macro_rules! impl_into_values_tuple {
    ($(($($name:ident : $t:ident),+)),*) => {
        $(impl<$($t: Into<Value>),+> IntoValues for ($($t,)+) {
            fn into_values(self) -> Values {
                let ($($name,)+) = self;
                Values {
                    items: vec![$($name.into()),+],
                    listed: false,
                }
            }
        })*
    };
}

impl_into_values_tuple!(
    (a: A),
    (a: A, b: B),
    (a: A, b: B, c: C),
    (a: A, b: B, c: C, d: D),
    (a: A, b: B, c: C, d: D, e: E),
    (a: A, b: B, c: C, d: D, e: E, f: F)
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_follow_runtime_types() {
        assert_eq!(Value::from(1).kind_name(), "integer");
        assert_eq!(Value::from(1u32).kind_name(), "integer");
        assert_eq!(Value::from(1.5).kind_name(), "double");
        assert_eq!(Value::from("x").kind_name(), "string");
        assert_eq!(Value::from(true).kind_name(), "boolean");
        assert_eq!(Value::Null.kind_name(), "NULL");
    }

    #[test]
    fn scalar_input_is_not_listed() {
        let v = 42.into_values();
        assert_eq!(v.items(), &[Value::Int(42)]);
        assert!(!v.is_listed());
    }

    #[test]
    fn vec_input_is_listed() {
        let v = vec![1, 2, 3].into_values();
        assert_eq!(v.len(), 3);
        assert!(v.is_listed());
    }

    #[test]
    fn tuple_input_is_heterogeneous_and_not_listed() {
        let v = ("a", 5).into_values();
        assert_eq!(
            v.items(),
            &[Value::Text("a".to_string()), Value::Int(5)]
        );
        assert!(!v.is_listed());
    }

    #[test]
    fn text_coerces_leading_numeric_prefix() {
        assert_eq!(Value::from("12abc").as_i64(), 12);
        assert_eq!(Value::from("-3.5x").as_f64(), -3.5);
        assert_eq!(Value::from("abc").as_i64(), 0);
    }

    #[test]
    fn option_none_becomes_null() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".to_string()));
    }
}
