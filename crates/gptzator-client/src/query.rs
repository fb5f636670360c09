//! Query-string builder for collection filters.
//!
//! The platform parses nested bracket keys, so a filter such as
//! `{ where: { name: { contains: "x" } } }` travels as
//! `where[name][contains]=x` and lists as `where[id][in][0]=a&where[id][in][1]=b`.

use std::fmt::Display;

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Add a top-level parameter if `value` is present.
    pub fn param_opt<V: Display>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// `where[field][equals]=value`
    pub fn where_equals(self, field: &str, value: impl Display) -> Self {
        self.param(format!("where[{}][equals]", field), value)
    }

    /// `where[field][contains]=value`
    pub fn where_contains(self, field: &str, value: impl Display) -> Self {
        self.param(format!("where[{}][contains]", field), value)
    }

    /// `<field>[contains]=value` at the top level.
    pub fn field_contains(self, field: &str, value: impl Display) -> Self {
        self.param(format!("{}[contains]", field), value)
    }

    /// `<field>[equals]=value` at the top level.
    pub fn field_equals(self, field: &str, value: impl Display) -> Self {
        self.param(format!("{}[equals]", field), value)
    }

    /// `where[field][in][i]=value` for each value.
    pub fn where_in<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for (i, value) in values.into_iter().enumerate() {
            self = self.param(format!("where[{}][in][{}]", field, i), value);
        }
        self
    }

    /// `field[in][i]=value` at the top level.
    pub fn field_in<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Display,
    {
        for (i, value) in values.into_iter().enumerate() {
            self = self.param(format!("{}[in][{}]", field, i), value);
        }
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_filters() {
        let query = Query::new()
            .where_contains("name", "crm")
            .where_equals("application", "app-1")
            .param("limit", 20)
            .param_opt("page", None::<u32>);

        assert_eq!(
            query.pairs(),
            &[
                ("where[name][contains]".to_string(), "crm".to_string()),
                ("where[application][equals]".to_string(), "app-1".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_in_filter_is_indexed() {
        let query = Query::new().where_in("id", ["a", "b"]);
        assert_eq!(
            query.pairs(),
            &[
                ("where[id][in][0]".to_string(), "a".to_string()),
                ("where[id][in][1]".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_in_filter_adds_nothing() {
        let query = Query::new().where_in("id", Vec::<String>::new());
        assert!(query.is_empty());
    }
}
