use crate::http::query_string;
use crate::response::PageParams;
use std::fmt;

/// What a cached query was asked for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyParams {
    List {
        page: u32,
        limit: u32,
        /// Rendered non-empty filters, in a fixed order per resource.
        filters: String,
    },
    Item(String),
    /// Parameterless resource-specific reads (stats, categories, graph, …).
    Named(String),
}

/// Cache key. `scope` groups keys that one mutation invalidates together
/// (graph nodes and relationships share a scope); `resource` separates the
/// families inside a scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    scope: String,
    resource: String,
    params: KeyParams,
}

impl QueryKey {
    pub fn list(scope: &str, resource: &str, page: PageParams, filters: &[(String, String)]) -> Self {
        QueryKey {
            scope: scope.to_string(),
            resource: resource.to_string(),
            params: KeyParams::List {
                page: page.page,
                limit: page.limit,
                filters: query_string(filters),
            },
        }
    }

    pub fn item(scope: &str, resource: &str, id: &str) -> Self {
        QueryKey {
            scope: scope.to_string(),
            resource: resource.to_string(),
            params: KeyParams::Item(id.to_string()),
        }
    }

    pub fn named(scope: &str, resource: &str, name: &str) -> Self {
        QueryKey {
            scope: scope.to_string(),
            resource: resource.to_string(),
            params: KeyParams::Named(name.to_string()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn params(&self) -> &KeyParams {
        &self.params
    }

    pub fn is_item(&self) -> bool {
        matches!(self.params, KeyParams::Item(_))
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            KeyParams::List { page, limit, filters } => {
                write!(f, "{}/{}?page={}&limit={}", self.scope, self.resource, page, limit)?;
                if !filters.is_empty() {
                    write!(f, "&{}", filters)?;
                }
                Ok(())
            }
            KeyParams::Item(id) => write!(f, "{}/{}/{}", self.scope, self.resource, id),
            KeyParams::Named(name) => write!(f, "{}/{}:{}", self.scope, self.resource, name),
        }
    }
}
