//! Column metadata and type information

use serde::{Deserialize, Serialize};

/// Semantic type tag for a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    String,
    Int,
    Float,
    DateTime,
    Bool,
    Other,
}

impl CellType {
    /// Widen the type to accommodate another type
    pub fn widen(self, other: CellType) -> CellType {
        if self == other {
            return self;
        }

        match (self, other) {
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            _ => CellType::String,
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::String => write!(f, "string"),
            CellType::Int => write!(f, "integer"),
            CellType::Float => write!(f, "float"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Bool => write!(f, "boolean"),
            CellType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for CellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" | "text" => Ok(CellType::String),
            "integer" | "int" => Ok(CellType::Int),
            "float" | "double" | "real" => Ok(CellType::Float),
            "datetime" | "date" => Ok(CellType::DateTime),
            "boolean" | "bool" => Ok(CellType::Bool),
            "other" => Ok(CellType::Other),
            _ => Err(format!("Unknown column type: {}", s)),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, unique within a table
    pub name: String,
    /// Declared semantic type
    pub cell_type: CellType,
}

impl Column {
    /// Create a string-typed column
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, CellType::String)
    }

    /// Create a column with a specified type
    pub fn with_type(name: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            name: name.into(),
            cell_type,
        }
    }
}

impl std::str::FromStr for Column {
    type Err = String;

    /// Parse `name` or `name:type`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once(':') {
            Some((name, ty)) if !name.is_empty() => Ok(Column::with_type(name, ty.parse()?)),
            _ => Ok(Column::new(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widen() {
        assert_eq!(CellType::Int.widen(CellType::Int), CellType::Int);
        assert_eq!(CellType::Int.widen(CellType::Float), CellType::Float);
        assert_eq!(CellType::Bool.widen(CellType::Int), CellType::String);
    }

    #[test]
    fn test_parse_column_spec() {
        let col: Column = "shipped:datetime".parse().unwrap();
        assert_eq!(col, Column::with_type("shipped", CellType::DateTime));

        let col: Column = "name".parse().unwrap();
        assert_eq!(col, Column::new("name"));

        assert!("qty:decimal128".parse::<Column>().is_err());
    }
}
