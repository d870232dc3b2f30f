use super::{string_or_number, QueryFilters};
use crate::error::ValidationErrors;
use crate::http::{push_query, QueryPairs};
use crate::validation::{is_present, Validate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Edge between two nodes. Endpoints are opaque ids; nothing checks they
/// exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphRelationship {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_node_id: String,
    pub end_node_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub relationships: Vec<GraphRelationship>,
}

impl GraphData {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Relationships touching `node_id` at either end.
    pub fn relationships_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphRelationship> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.start_node_id == node_id || r.end_node_id == node_id)
    }

    /// Relationships whose endpoints match no node in this snapshot.
    pub fn dangling_relationships(&self) -> Vec<&GraphRelationship> {
        self.relationships
            .iter()
            .filter(|r| self.node(&r.start_node_id).is_none() || self.node(&r.end_node_id).is_none())
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeForm {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipForm {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_node_id: String,
    pub end_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeFilters {
    pub label: Option<String>,
}

impl QueryFilters for NodeFilters {
    fn to_query(&self) -> QueryPairs {
        let mut q = QueryPairs::new();
        push_query(&mut q, "label", self.label.as_deref());
        q
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelationshipFilters {
    pub kind: Option<String>,
}

impl QueryFilters for RelationshipFilters {
    fn to_query(&self) -> QueryPairs {
        let mut q = QueryPairs::new();
        push_query(&mut q, "type", self.kind.as_deref());
        q
    }
}

/// Raw Cypher sent to the graph query endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CypherQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
}

impl CypherQuery {
    pub fn new(query: impl Into<String>) -> Self {
        CypherQuery {
            query: query.into(),
            parameters: Map::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CypherResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
}

impl Validate for NodeForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_present(&self.label) {
            errors.add("label", "Label é obrigatório");
        }
        errors.into_result()
    }
}

impl Validate for RelationshipForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_present(&self.kind) {
            errors.add("type", "Type é obrigatório");
        }
        if !is_present(&self.start_node_id) {
            errors.add("startNodeId", "Nó inicial é obrigatório");
        }
        if !is_present(&self.end_node_id) {
            errors.add("endNodeId", "Nó final é obrigatório");
        }
        errors.into_result()
    }
}

impl Validate for CypherQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let upper = self.query.trim().to_uppercase();
        if upper.is_empty() || !["MATCH", "CREATE", "RETURN"].iter().any(|k| upper.contains(k)) {
            errors.add("query", "Consulta Cypher inválida");
        }
        errors.into_result()
    }
}
