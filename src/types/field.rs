//! Per-field metadata supplied by a result set.
//!
//! This mirrors the attributes of a VOTable FIELD element. For the cursor's
//! view of a column, use `ColumnDescriptor`.

use super::datatype::Datatype;

/// UCDs that mark a column as holding a dataset access URL.
const ACCESS_URL_UCDS: &[&str] = &["meta.ref.url", "VOX:Image_AccessReference"];

/// Utype suffix that marks a column as holding a dataset access URL.
const ACCESS_URL_UTYPE_SUFFIX: &str = "access.reference";

/// Metadata of a single result field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDesc {
    /// Field name.
    pub name: String,
    /// Field ID attribute.
    pub id: Option<String>,
    /// Declared primitive datatype.
    pub datatype: Datatype,
    /// Unified Content Descriptor (controlled-vocabulary semantic tag).
    pub ucd: Option<String>,
    /// Free-form role tag.
    pub utype: Option<String>,
    /// Unit string.
    pub unit: Option<String>,
    /// Array size attribute, e.g. `*` for variable-length strings.
    pub arraysize: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl FieldDesc {
    /// Create field metadata with only a name and datatype.
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            id: None,
            datatype,
            ucd: None,
            utype: None,
            unit: None,
            arraysize: None,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ucd(mut self, ucd: impl Into<String>) -> Self {
        self.ucd = Some(ucd.into());
        self
    }

    pub fn with_utype(mut self, utype: impl Into<String>) -> Self {
        self.utype = Some(utype.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_arraysize(mut self, arraysize: impl Into<String>) -> Self {
        self.arraysize = Some(arraysize.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the UCD equals `ucd`, ignoring ASCII case.
    pub fn has_ucd(&self, ucd: &str) -> bool {
        self.ucd
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case(ucd))
    }

    /// Whether the utype equals `utype`, ignoring ASCII case.
    pub fn has_utype(&self, utype: &str) -> bool {
        self.utype
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case(utype))
    }

    /// Whether the utype ends with `suffix`, ignoring ASCII case.
    pub fn utype_ends_with(&self, suffix: &str) -> bool {
        self.utype
            .as_deref()
            .is_some_and(|u| u.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()))
    }

    /// Whether this field carries a dataset access URL.
    pub fn is_access_url(&self) -> bool {
        ACCESS_URL_UCDS.iter().any(|ucd| self.has_ucd(ucd))
            || self.utype_ends_with(ACCESS_URL_UTYPE_SUFFIX)
    }
}
