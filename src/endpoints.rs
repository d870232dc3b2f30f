//! Endpoint registry: resource families mapped to backend paths.
//!
//! Paths are kept as segments so ids (cache keys may contain `:` or `/`) are
//! percent-encoded as a single segment when joined onto the base url.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path relative to the configured base url.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    pub fn new(segments: &[&str]) -> Self {
        ApiPath {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.segments {
            write!(f, "/{}", s)?;
        }
        Ok(())
    }
}

/// Backing store of a resource family, as recorded in the activity log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Postgres,
    Mongodb,
    Redis,
    Neo4j,
}

impl Database {
    pub fn display_name(self) -> &'static str {
        match self {
            Database::Postgres => "PostgreSQL",
            Database::Mongodb => "MongoDB",
            Database::Redis => "Redis",
            Database::Neo4j => "Neo4j",
        }
    }
}

/// Resource families with a CRUD collection endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Usuarios,
    Documentos,
    CacheEntries,
    GraphNodes,
    GraphRelationships,
}

impl ResourceKind {
    /// `GET`/`POST` collection path.
    pub fn collection(self) -> ApiPath {
        match self {
            ResourceKind::Usuarios => ApiPath::new(&["postgres", "usuarios"]),
            ResourceKind::Documentos => ApiPath::new(&["mongo", "documentos"]),
            ResourceKind::CacheEntries => ApiPath::new(&["redis", "keys"]),
            ResourceKind::GraphNodes => ApiPath::new(&["neo4j", "nodes"]),
            ResourceKind::GraphRelationships => ApiPath::new(&["neo4j", "relationships"]),
        }
    }

    /// `GET`/`PUT`/`DELETE` item path.
    pub fn item(self, id: &str) -> ApiPath {
        self.collection().join(id)
    }

    pub fn database(self) -> Database {
        match self {
            ResourceKind::Usuarios => Database::Postgres,
            ResourceKind::Documentos => Database::Mongodb,
            ResourceKind::CacheEntries => Database::Redis,
            ResourceKind::GraphNodes | ResourceKind::GraphRelationships => Database::Neo4j,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Usuarios => "usuarios",
            ResourceKind::Documentos => "documentos",
            ResourceKind::CacheEntries => "cache-entries",
            ResourceKind::GraphNodes => "nodes",
            ResourceKind::GraphRelationships => "relationships",
        }
    }
}

pub fn usuario_email_exists() -> ApiPath {
    ResourceKind::Usuarios.collection().join("email-exists")
}

pub fn documento_search() -> ApiPath {
    ResourceKind::Documentos.collection().join("search")
}

pub fn documento_categories() -> ApiPath {
    ResourceKind::Documentos.collection().join("categories")
}

pub fn documento_stats() -> ApiPath {
    ResourceKind::Documentos.collection().join("stats")
}

pub fn documento_tags() -> ApiPath {
    ResourceKind::Documentos.collection().join("tags")
}

pub fn redis_stats() -> ApiPath {
    ApiPath::new(&["redis", "stats"])
}

pub fn redis_flush() -> ApiPath {
    ApiPath::new(&["redis", "flush"])
}

pub fn graph() -> ApiPath {
    ApiPath::new(&["neo4j", "graph"])
}

pub fn graph_query() -> ApiPath {
    ApiPath::new(&["neo4j", "query"])
}

pub fn health_status() -> ApiPath {
    ApiPath::new(&["health"])
}

pub fn health_databases() -> ApiPath {
    ApiPath::new(&["health", "databases"])
}
