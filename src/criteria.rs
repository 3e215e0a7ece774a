use crate::error::Error;
use crate::schema::validate_identifier;
use crate::value::Value;

/// A criteria set: field names mapped to filter values, in insertion order.
///
/// Used by delete-by-criteria. Empty values (see [`Value::is_empty`]) are
/// kept in the set but excluded when the WHERE clause is built, so callers
/// can pass every field through and let blanks fall away.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Criteria {
    entries: Vec<(String, Value)>,
}

/// A rendered conjunctive filter: SQL fragment plus named-parameter bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    /// e.g. `name = :name AND age = :age`
    pub sql: String,
    /// Bindings keyed with the `:` prefix rusqlite expects.
    pub params: Vec<(String, Value)>,
    /// Human-readable rendering, e.g. `age = '28'`, for status lines.
    pub conditions: String,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value. Setting a field twice overwrites the value but
    /// keeps the field's original position.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == field) {
            entry.1 = value;
        } else {
            self.entries.push((field.to_string(), value));
        }
        self
    }

    /// Whether the set contains no usable (non-empty) filter value.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_empty())
    }

    /// Build the conjunctive WHERE clause from the non-empty entries, in
    /// insertion order. Returns [`Error::EmptyCriteria`] when every value is
    /// empty; a filter that matches the whole table is never produced.
    pub fn where_clause(&self) -> Result<WhereClause, Error> {
        let mut fragments = Vec::new();
        let mut params = Vec::new();
        let mut conditions = Vec::new();

        for (field, value) in &self.entries {
            if value.is_empty() {
                continue;
            }
            validate_identifier(field)?;
            fragments.push(format!("{field} = :{field}"));
            params.push((format!(":{field}"), value.clone()));
            conditions.push(format!("{field} = {}", value.display_quoted()));
        }

        if fragments.is_empty() {
            return Err(Error::EmptyCriteria);
        }

        Ok(WhereClause {
            sql: fragments.join(" AND "),
            params,
            conditions: conditions.join(" AND "),
        })
    }
}
