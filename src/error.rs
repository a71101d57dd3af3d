use std::fmt::{Display, Formatter};

use compact_str::CompactString;

/// Which categorical field of a record failed to classify.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Field {
    Region,
    Product,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Region => write!(f, "region"),
            Field::Product => write!(f, "product"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A record carried a region or product outside the fixed enumerations.
    InvalidCategory {
        field: Field,
        value: CompactString,
    },
    /// The dataflow path could not represent an amount.
    Dataflow(String),
}

impl Error {
    pub(crate) fn invalid_category(field: Field, value: &str) -> Self {
        Error::InvalidCategory {
            field,
            value: CompactString::new(value),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidCategory { field, value } => {
                write!(f, "invalid {field}: `{value}`")
            }
            Error::Dataflow(msg) => write!(f, "dataflow error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
