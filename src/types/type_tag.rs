//! Column type taxonomy.
//!
//! A [`TypeTag`] classifies a column into one of five fixed categories. Two of
//! them specialize a broader category and compare equal to it: `DATETIME`
//! equals `STRING` and `ROWID` equals `NUMBER`.

use std::fmt;

/// Semantic data category of a column.
///
/// Equality is not identity: two tags are equal when either tag's id appears
/// in the other's accepted ids.
#[derive(Debug, Clone, Copy)]
pub enum TypeTag {
    String,
    Binary,
    Number,
    DateTime,
    RowId,
}

impl TypeTag {
    /// Primary identifier.
    pub const fn id(self) -> u8 {
        match self {
            TypeTag::String => 0,
            TypeTag::Binary => 1,
            TypeTag::Number => 2,
            TypeTag::DateTime => 3,
            TypeTag::RowId => 4,
        }
    }

    /// Identifiers this tag matches against, its own first.
    pub const fn accepted_ids(self) -> &'static [u8] {
        match self {
            TypeTag::String => &[0],
            TypeTag::Binary => &[1],
            TypeTag::Number => &[2],
            TypeTag::DateTime => &[3, 0],
            TypeTag::RowId => &[4, 2],
        }
    }

    /// Whether `other` is this tag or one it specializes (or vice versa).
    pub fn matches(self, other: TypeTag) -> bool {
        self.accepted_ids().contains(&other.id()) || other.accepted_ids().contains(&self.id())
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.matches(*other)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::String => "STRING",
            TypeTag::Binary => "BINARY",
            TypeTag::Number => "NUMBER",
            TypeTag::DateTime => "DATETIME",
            TypeTag::RowId => "ROWID",
        };
        f.write_str(name)
    }
}

pub const STRING: TypeTag = TypeTag::String;
pub const BINARY: TypeTag = TypeTag::Binary;
pub const NUMBER: TypeTag = TypeTag::Number;
pub const DATETIME: TypeTag = TypeTag::DateTime;
pub const ROWID: TypeTag = TypeTag::RowId;
