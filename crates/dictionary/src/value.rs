use crate::key::ToKey;
use crate::List;
use smol_str::{SmolStr, ToSmolStr};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Dynamically typed value for dictionaries that mix value types.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmolStr),
    List(List<Value>),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                let mut first = true;
                for item in items {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl ToKey for Value {
    fn to_key(&self) -> SmolStr {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_smolstr(),
        }
    }
}

/// Parses command-line text: `nil`, booleans, integers and floats are
/// recognised, anything else is kept as a string.
impl FromStr for Value {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = match s {
            "nil" => Value::Nil,
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => {
                // Numbers only when printing them gives back the same text,
                // so `01`, `+1` or `1.0` stay distinct strings.
                match (s.parse::<i64>(), s.parse::<f64>()) {
                    (Ok(i), _) if i.to_string() == s => Value::Int(i),
                    (_, Ok(x)) if x.is_finite() && x.to_string() == s => Value::Float(x),
                    _ => Value::Str(SmolStr::new(s)),
                }
            }
        };
        Ok(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! int_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

int_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(SmolStr::new(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(SmolStr::new(value))
    }
}

impl From<SmolStr> for Value {
    fn from(value: SmolStr) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}
