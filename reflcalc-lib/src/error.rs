use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReflError {
    ShapeMismatch {
        name: &'static str,
        len: usize,
        expected: usize,
    },
    InvalidInput {
        name: &'static str,
        index: usize,
        value: f64,
    },
    NotIncreasing {
        name: &'static str,
        index: usize,
    },
    Empty {
        name: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ReflError>;

impl fmt::Display for ReflError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch {
                name,
                len,
                expected,
            } => {
                write!(f, "'{name}' has length {len}, expected {expected}")
            }
            Self::InvalidInput { name, index, value } => {
                write!(f, "invalid value {value} in '{name}' at index {index}")
            }
            Self::NotIncreasing { name, index } => {
                write!(f, "'{name}' must be strictly increasing at index {index}")
            }
            Self::Empty { name } => write!(f, "'{name}' must not be empty"),
        }
    }
}

impl std::error::Error for ReflError {}
