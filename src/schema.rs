use crate::error::Error;

/// Schema definition for the SQLite database.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Integer,
    Text,
    Real,
    Blob,
}

impl DataType {
    fn sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Blob => "BLOB",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey,
    AutoIncrement,
    NotNull,
    Unique,
}

impl ColumnConstraint {
    fn sql(&self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::AutoIncrement => "AUTOINCREMENT",
            Self::NotNull => "NOT NULL",
            Self::Unique => "UNIQUE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl TableDefinition {
    /// Render the idempotent CREATE TABLE statement for this table.
    ///
    /// All identifiers are validated before interpolation; values never
    /// appear here, so no parameters are involved.
    pub fn create_table_sql(&self) -> Result<String, Error> {
        validate_identifier(&self.name)?;
        let mut column_sql = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            validate_identifier(&column.name)?;
            let mut parts = vec![column.name.clone(), column.data_type.sql().to_string()];
            for constraint in &column.constraints {
                parts.push(constraint.sql().to_string());
            }
            column_sql.push(parts.join(" "));
        }
        Ok(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            column_sql.join(", ")
        ))
    }

    /// Render the idempotent CREATE INDEX statements for this table.
    pub fn create_index_sql(&self) -> Result<Vec<String>, Error> {
        let mut statements = Vec::with_capacity(self.indexes.len());
        for index in &self.indexes {
            validate_identifier(&index.name)?;
            for column in &index.columns {
                validate_identifier(column)?;
            }
            let unique = if index.unique { "UNIQUE " } else { "" };
            statements.push(format!(
                "CREATE {unique}INDEX IF NOT EXISTS {} ON {} ({})",
                index.name,
                self.name,
                index.columns.join(", ")
            ));
        }
        Ok(statements)
    }
}

/// The canonical user table: generated id plus name, email, and age.
pub fn users_table(name: &str) -> TableDefinition {
    TableDefinition {
        name: name.to_string(),
        columns: vec![
            ColumnDefinition {
                name: "id".to_string(),
                data_type: DataType::Integer,
                constraints: vec![ColumnConstraint::PrimaryKey, ColumnConstraint::AutoIncrement],
            },
            ColumnDefinition {
                name: "name".to_string(),
                data_type: DataType::Text,
                constraints: vec![],
            },
            ColumnDefinition {
                name: "email".to_string(),
                data_type: DataType::Text,
                constraints: vec![],
            },
            ColumnDefinition {
                name: "age".to_string(),
                data_type: DataType::Integer,
                constraints: vec![],
            },
        ],
        indexes: vec![IndexDefinition {
            name: format!("idx_{name}_email"),
            columns: vec!["email".to_string()],
            unique: false,
        }],
    }
}

/// Identifiers are interpolated into SQL text, unlike values, so they are
/// restricted to `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn validate_identifier(name: &str) -> Result<(), Error> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}
