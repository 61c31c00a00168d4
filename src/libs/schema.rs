use crate::libs::record::ScalarKind;

/// One column of a table, derived from one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// SQL column type; empty unless types were resolved.
    pub sql_type: String,
    /// Field value as text; empty means absent.
    pub literal_value: String,
    pub kind: ScalarKind,
}

impl ColumnDescriptor {
    pub fn is_identity(&self) -> bool {
        self.name == IDENTITY_COLUMN
    }

    pub fn is_present(&self) -> bool {
        !self.literal_value.is_empty()
    }
}

/// Table name plus its columns in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
}

pub const IDENTITY_COLUMN: &str = "id";

/// Lower-cases a type name and pluralizes it with a trailing `s`.
pub fn table_name_for(type_name: &str) -> String {
    let mut name = type_name.to_lowercase();
    if !name.ends_with('s') {
        name.push('s');
    }
    name
}
