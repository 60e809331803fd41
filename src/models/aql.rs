//! Artifactory Query Language (AQL) queries.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Domain a query searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AqlDomain {
    #[default]
    Items,
    Builds,
    Entries,
}

impl fmt::Display for AqlDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Items => "items",
            Self::Builds => "builds",
            Self::Entries => "entries",
        };
        f.write_str(name)
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "$asc")]
    Asc,
    #[serde(rename = "$desc")]
    Desc,
}

impl SortOrder {
    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "$asc",
            Self::Desc => "$desc",
        }
    }
}

/// Sort clause: one order over a list of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AqlSort {
    pub order: SortOrder,
    pub fields: Vec<String>,
}

/// An AQL query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aql {
    pub domain: AqlDomain,
    /// Criteria object, e.g. `{"repo": {"$eq": "libs-release-local"}}`.
    pub find: Option<Map<String, Value>>,
    pub include: Vec<String>,
    pub sort: Option<AqlSort>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl Aql {
    /// Query over `items` with the given criteria.
    #[must_use]
    pub fn find(criteria: Map<String, Value>) -> Self {
        Self {
            find: Some(criteria),
            ..Self::default()
        }
    }

    /// Renders the query text, e.g.
    /// `items.find({"repo":"x"}).include("name").sort({"$asc":["name"]}).limit(10)`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = match &self.find {
            Some(criteria) => format!("{}.find({})", self.domain, Value::Object(criteria.clone())),
            None => format!("{}.find()", self.domain),
        };
        if !self.include.is_empty() {
            let fields = self
                .include
                .iter()
                .map(|field| Value::String(field.clone()).to_string())
                .collect::<Vec<_>>()
                .join(",");
            query.push_str(&format!(".include({fields})"));
        }
        if let Some(sort) = &self.sort {
            let mut clause = Map::new();
            clause.insert(
                sort.order.keyword().to_string(),
                Value::from(sort.fields.clone()),
            );
            query.push_str(&format!(".sort({})", Value::Object(clause)));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!(".offset({offset})"));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(".limit({limit})"));
        }
        query
    }
}

/// Answer of an AQL search.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct AqlResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_find_only() {
        let criteria = json!({"repo": {"$eq": "libs-release-local"}});
        let aql = Aql::find(criteria.as_object().unwrap().clone());
        assert_eq!(
            aql.to_query_string(),
            r#"items.find({"repo":{"$eq":"libs-release-local"}})"#
        );
    }

    #[test]
    fn test_full_query_rendering() {
        let aql = Aql {
            domain: AqlDomain::Builds,
            find: None,
            include: vec!["artifact".into(), "artifact.module".into()],
            sort: Some(AqlSort {
                order: SortOrder::Asc,
                fields: vec!["remote_downloaded".into()],
            }),
            offset: Some(5),
            limit: Some(100),
        };
        assert_eq!(
            aql.to_query_string(),
            r#"builds.find().include("artifact","artifact.module").sort({"$asc":["remote_downloaded"]}).offset(5).limit(100)"#
        );
    }
}
