//! VOTable primitive datatypes.
//!
//! Parsing never fails: unrecognized names are kept as [`Datatype::Other`]
//! and classify as `STRING`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::type_tag::{TypeTag, NUMBER, STRING};

/// Primitive datatype declared for a result field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datatype {
    Boolean,
    Bit,
    UnsignedByte,
    Short,
    Int,
    Long,
    Char,
    UnicodeChar,
    Float,
    Double,
    FloatComplex,
    DoubleComplex,
    /// Any name outside the VOTable primitive set.
    Other(String),
}

impl Datatype {
    /// Parse a VOTable datatype attribute value.
    pub fn parse(name: &str) -> Self {
        match name {
            "boolean" => Datatype::Boolean,
            "bit" => Datatype::Bit,
            "unsignedByte" => Datatype::UnsignedByte,
            "short" => Datatype::Short,
            "int" => Datatype::Int,
            "long" => Datatype::Long,
            "char" => Datatype::Char,
            "unicodeChar" => Datatype::UnicodeChar,
            "float" => Datatype::Float,
            "double" => Datatype::Double,
            "floatComplex" => Datatype::FloatComplex,
            "doubleComplex" => Datatype::DoubleComplex,
            other => Datatype::Other(other.to_string()),
        }
    }

    /// The VOTable name of this datatype.
    pub fn as_str(&self) -> &str {
        match self {
            Datatype::Boolean => "boolean",
            Datatype::Bit => "bit",
            Datatype::UnsignedByte => "unsignedByte",
            Datatype::Short => "short",
            Datatype::Int => "int",
            Datatype::Long => "long",
            Datatype::Char => "char",
            Datatype::UnicodeChar => "unicodeChar",
            Datatype::Float => "float",
            Datatype::Double => "double",
            Datatype::FloatComplex => "floatComplex",
            Datatype::DoubleComplex => "doubleComplex",
            Datatype::Other(name) => name,
        }
    }

    /// Classify into the column type taxonomy.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Datatype::Short
            | Datatype::Int
            | Datatype::Long
            | Datatype::Float
            | Datatype::Double
            | Datatype::FloatComplex
            | Datatype::DoubleComplex
            | Datatype::Boolean => NUMBER,
            Datatype::Char | Datatype::UnicodeChar | Datatype::UnsignedByte => STRING,
            Datatype::Bit | Datatype::Other(_) => STRING,
        }
    }
}

impl FromStr for Datatype {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Datatype::parse(s))
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
