use super::{OpMessages, Resource, Updatable};
use crate::endpoints::{graph, graph_query, ResourceKind};
use crate::error::ApiError;
use crate::http::HttpClient;
use crate::model::{CypherQuery, CypherResult, GraphData, GraphNode, GraphRelationship, NodeFilters, NodeForm, RelationshipFilters, RelationshipForm};

/// Nodes and relationships invalidate together with the whole-graph view.
const GRAPH_SCOPE: &str = "graph";

pub struct NodeResource;

impl Resource for NodeResource {
    type Item = GraphNode;
    type Create = NodeForm;
    type Filters = NodeFilters;

    const KIND: ResourceKind = ResourceKind::GraphNodes;
    const SCOPE: &'static str = GRAPH_SCOPE;

    fn id_of(item: &GraphNode) -> &str {
        &item.id
    }

    fn label_of(item: &GraphNode) -> &str {
        &item.label
    }

    const CREATED: OpMessages = OpMessages {
        success: "Nó criado com sucesso!",
        failure_title: "Erro ao criar nó",
    };
    const DELETED: OpMessages = OpMessages {
        success: "Nó excluído com sucesso!",
        failure_title: "Erro ao excluir nó",
    };

    fn created(label: &str) -> String {
        format!("Nó criado: {}", label)
    }

    fn deleted(id: &str) -> String {
        format!("Nó excluído (ID: {})", id)
    }
}

impl Updatable for NodeResource {
    type Update = NodeForm;

    const UPDATED: OpMessages = OpMessages {
        success: "Nó atualizado com sucesso!",
        failure_title: "Erro ao atualizar nó",
    };

    fn updated(label: &str) -> String {
        format!("Nó atualizado: {}", label)
    }
}

/// Create and delete only.
pub struct RelationshipResource;

impl Resource for RelationshipResource {
    type Item = GraphRelationship;
    type Create = RelationshipForm;
    type Filters = RelationshipFilters;

    const KIND: ResourceKind = ResourceKind::GraphRelationships;
    const SCOPE: &'static str = GRAPH_SCOPE;

    fn id_of(item: &GraphRelationship) -> &str {
        &item.id
    }

    fn label_of(item: &GraphRelationship) -> &str {
        &item.kind
    }

    const CREATED: OpMessages = OpMessages {
        success: "Relacionamento criado com sucesso!",
        failure_title: "Erro ao criar relacionamento",
    };
    const DELETED: OpMessages = OpMessages {
        success: "Relacionamento excluído com sucesso!",
        failure_title: "Erro ao excluir relacionamento",
    };

    fn created(label: &str) -> String {
        format!("Relacionamento criado: {}", label)
    }

    fn deleted(id: &str) -> String {
        format!("Relacionamento excluído (ID: {})", id)
    }
}

/// Whole-graph reads and raw Cypher.
#[derive(Clone)]
pub struct GraphService {
    http: HttpClient,
}

impl GraphService {
    pub const SCOPE: &'static str = GRAPH_SCOPE;

    pub fn new(http: HttpClient) -> Self {
        GraphService { http }
    }

    pub async fn graph(&self) -> Result<GraphData, ApiError> {
        self.http.get(&graph(), &[]).await
    }

    pub async fn query(&self, cypher: &CypherQuery) -> Result<CypherResult, ApiError> {
        self.http.post(&graph_query(), Some(cypher)).await
    }
}
