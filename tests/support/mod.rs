//! In-memory stand-in for the dashboard backend, served on an ephemeral port.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use multistore_sdk::{ClientConfig, DashboardClient, QueryConfig};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockState {
    pub usuarios: Vec<Value>,
    pub documentos: Vec<Value>,
    pub entries: Vec<Value>,
    pub nodes: Vec<Value>,
    pub relationships: Vec<Value>,
    next_id: u64,
    hits: HashMap<&'static str, usize>,
}

impl MockState {
    fn hit(&mut self, route: &'static str) {
        *self.hits.entry(route).or_default() += 1;
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("local addr");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock backend");
        });
        MockBackend {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Client without fetch retries so request counts are exact.
    pub fn client(&self) -> DashboardClient {
        DashboardClient::new(config(&self.base_url)).expect("client")
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn seed_usuarios(&self, n: usize) {
        let mut s = self.state.lock().unwrap();
        for i in 0..n {
            let id = s.next_id();
            s.usuarios.push(json!({
                "id": id,
                "nome": format!("Pessoa {}", i),
                "email": format!("pessoa{}@example.com", i),
                "idade": 20 + (i % 50),
            }));
        }
    }
}

pub fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        query: QueryConfig {
            retries: 0,
            retry_delay_ms: 10,
            ..QueryConfig::default()
        },
        ..ClientConfig::with_base_url(base_url)
    }
}

/// Base url of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/api", addr)
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/postgres/usuarios", get(list_usuarios).post(create_usuario))
        .route("/api/postgres/usuarios/email-exists", get(email_exists))
        .route(
            "/api/postgres/usuarios/:id",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
        .route("/api/mongo/documentos", get(list_documentos).post(create_documento))
        .route("/api/mongo/documentos/search", get(search_documentos))
        .route("/api/mongo/documentos/categories", get(documento_categories))
        .route("/api/mongo/documentos/tags", get(documento_tags))
        .route("/api/mongo/documentos/stats", get(documento_stats))
        .route(
            "/api/mongo/documentos/:id",
            get(get_documento).put(update_documento).delete(delete_documento),
        )
        .route("/api/redis/keys", get(list_entries).post(create_entry))
        .route("/api/redis/keys/:key", get(get_entry).delete(delete_entry))
        .route("/api/redis/stats", get(redis_stats))
        .route("/api/redis/flush", post(redis_flush))
        .route("/api/neo4j/nodes", get(list_nodes).post(create_node))
        .route("/api/neo4j/relationships", post(create_relationship))
        .route("/api/neo4j/graph", get(graph))
        .route("/api/health", get(|| async { Json(json!({ "status": "ok", "uptime": 12 })) }))
        .with_state(state)
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": message, "error": "Not Found", "statusCode": 404 })),
    )
        .into_response()
}

fn id_matches(v: &Value, id: &str) -> bool {
    match &v["id"] {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}

fn page_of(items: Vec<Value>, q: &HashMap<String, String>, field: &str) -> Value {
    let page: usize = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);
    let total = items.len();
    let slice: Vec<Value> = items.into_iter().skip(page.saturating_sub(1) * limit).take(limit).collect();
    let mut body = json!({
        "total": total,
        "page": page,
        "limit": limit,
        "totalPages": std::cmp::max(1, total.div_ceil(limit)),
    });
    body[field] = Value::Array(slice);
    body
}

async fn list_usuarios(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /usuarios");
    let search = q.get("search").map(|t| t.to_lowercase());
    let items: Vec<Value> = s
        .usuarios
        .iter()
        .filter(|u| match &search {
            Some(t) => u["nome"].as_str().unwrap_or("").to_lowercase().contains(t.as_str()),
            None => true,
        })
        .cloned()
        .collect();
    Json(page_of(items, &q, "usuarios"))
}

async fn create_usuario(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    s.hit("POST /usuarios");
    if s.usuarios.iter().any(|u| u["email"] == body["email"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email já cadastrado", "error": "Conflict" })),
        )
            .into_response();
    }
    let id = s.next_id();
    let mut created = body;
    created["id"] = json!(id);
    created["createdAt"] = json!("2024-05-01T12:00:00Z");
    s.usuarios.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn email_exists(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let s = s.lock().unwrap();
    let email = q.get("email").cloned().unwrap_or_default();
    let exclude = q.get("excludeId");
    let exists = s
        .usuarios
        .iter()
        .any(|u| u["email"] == email.as_str() && exclude.map_or(true, |id| !id_matches(u, id)));
    Json(json!({ "exists": exists }))
}

async fn get_usuario(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = s.lock().unwrap();
    s.hit("GET /usuarios/:id");
    match s.usuarios.iter().find(|u| id_matches(u, &id)) {
        Some(u) => Json(u.clone()).into_response(),
        None => not_found("Usuário não encontrado"),
    }
}

async fn update_usuario(State(s): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let Some(u) = s.usuarios.iter_mut().find(|u| id_matches(u, &id)) else {
        return not_found("Usuário não encontrado");
    };
    if let Value::Object(fields) = body {
        for (k, v) in fields {
            u[k.as_str()] = v;
        }
    }
    Json(u.clone()).into_response()
}

async fn delete_usuario(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = s.lock().unwrap();
    let before = s.usuarios.len();
    s.usuarios.retain(|u| !id_matches(u, &id));
    if s.usuarios.len() == before {
        return not_found("Usuário não encontrado");
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Documents carry a Mongo-style `_id`.
fn documento_matches(d: &Value, id: &str) -> bool {
    d["_id"] == id
}

async fn list_documentos(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /documentos");
    let items: Vec<Value> = s
        .documentos
        .iter()
        .filter(|d| q.get("categoria").map_or(true, |c| d["categoria"] == c.as_str()))
        .cloned()
        .collect();
    Json(page_of(items, &q, "documentos"))
}

async fn create_documento(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let id = s.next_id();
    let mut created = body;
    created["_id"] = json!(format!("d{}", id));
    created["dataCriacao"] = json!("2024-05-01T12:00:00Z");
    s.documentos.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_documento(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    let s = s.lock().unwrap();
    match s.documentos.iter().find(|d| documento_matches(d, &id)) {
        Some(d) => Json(d.clone()).into_response(),
        None => not_found("Documento não encontrado"),
    }
}

async fn update_documento(State(s): State<Shared>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let Some(d) = s.documentos.iter_mut().find(|d| documento_matches(d, &id)) else {
        return not_found("Documento não encontrado");
    };
    if let Value::Object(fields) = body {
        for (k, v) in fields {
            d[k.as_str()] = v;
        }
    }
    d["dataAtualizacao"] = json!("2024-05-02T08:30:00Z");
    Json(d.clone()).into_response()
}

async fn delete_documento(State(s): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = s.lock().unwrap();
    let before = s.documentos.len();
    s.documentos.retain(|d| !documento_matches(d, &id));
    if s.documentos.len() == before {
        return not_found("Documento não encontrado");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn search_documentos(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /documentos/search");
    let text = q.get("q").map(|t| t.to_lowercase()).unwrap_or_default();
    let found: Vec<Value> = s
        .documentos
        .iter()
        .filter(|d| {
            ["titulo", "conteudo"]
                .iter()
                .any(|f| d[*f].as_str().unwrap_or("").to_lowercase().contains(text.as_str()))
        })
        .cloned()
        .collect();
    Json(Value::Array(found))
}

fn distinct(docs: &[Value], pick: impl Fn(&Value) -> Vec<String>) -> Vec<String> {
    docs.iter().flat_map(pick).collect::<BTreeSet<_>>().into_iter().collect()
}

async fn documento_categories(State(s): State<Shared>) -> Json<Vec<String>> {
    let mut s = s.lock().unwrap();
    s.hit("GET /documentos/categories");
    Json(distinct(&s.documentos, |d| d["categoria"].as_str().map(str::to_string).into_iter().collect()))
}

async fn documento_tags(State(s): State<Shared>) -> Json<Vec<String>> {
    let s = s.lock().unwrap();
    Json(distinct(&s.documentos, |d| {
        d["tags"]
            .as_array()
            .map(|tags| tags.iter().filter_map(|t| t.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }))
}

async fn documento_stats(State(s): State<Shared>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /documentos/stats");
    let mut per_category: BTreeMap<String, usize> = BTreeMap::new();
    for d in &s.documentos {
        *per_category.entry(d["categoria"].as_str().unwrap_or("").to_string()).or_default() += 1;
    }
    Json(json!({ "total": s.documentos.len(), "porCategoria": per_category }))
}

/// Only `{entries, total}`, like the real key-value endpoint.
async fn list_entries(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /keys");
    let prefix = q.get("pattern").map(|p| p.trim_end_matches('*').to_string());
    let entries: Vec<Value> = s
        .entries
        .iter()
        .filter(|e| prefix.as_deref().map_or(true, |p| e["key"].as_str().unwrap_or("").starts_with(p)))
        .cloned()
        .collect();
    Json(json!({ "total": entries.len(), "entries": entries }))
}

async fn create_entry(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let mut entry = body;
    entry["type"] = json!("string");
    s.entries.push(entry.clone());
    (StatusCode::CREATED, Json(entry)).into_response()
}

async fn get_entry(State(s): State<Shared>, Path(key): Path<String>) -> Response {
    let s = s.lock().unwrap();
    match s.entries.iter().find(|e| e["key"] == key.as_str()) {
        Some(e) => Json(e.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Bare 404 without a body for unknown keys.
async fn delete_entry(State(s): State<Shared>, Path(key): Path<String>) -> Response {
    let mut s = s.lock().unwrap();
    let before = s.entries.len();
    s.entries.retain(|e| e["key"] != key.as_str());
    if s.entries.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn redis_stats(State(s): State<Shared>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /stats");
    Json(json!({ "totalKeys": s.entries.len(), "usedMemory": "1.2M", "uptime": 3600, "version": "7.2.4" }))
}

async fn redis_flush(State(s): State<Shared>) -> Json<Value> {
    s.lock().unwrap().entries.clear();
    Json(json!({ "success": true }))
}

async fn list_nodes(State(s): State<Shared>, Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let s = s.lock().unwrap();
    Json(page_of(s.nodes.clone(), &q, "nodes"))
}

async fn create_node(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let id = s.next_id();
    let node = json!({
        "id": id.to_string(),
        "label": body["label"],
        "properties": body.get("properties").cloned().unwrap_or_else(|| json!({})),
    });
    s.nodes.push(node.clone());
    (StatusCode::CREATED, Json(node)).into_response()
}

async fn create_relationship(State(s): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = s.lock().unwrap();
    let id = s.next_id();
    let mut rel = body;
    rel["id"] = json!(format!("r{}", id));
    s.relationships.push(rel.clone());
    (StatusCode::CREATED, Json(rel)).into_response()
}

async fn graph(State(s): State<Shared>) -> Json<Value> {
    let mut s = s.lock().unwrap();
    s.hit("GET /graph");
    Json(json!({ "nodes": s.nodes, "relationships": s.relationships }))
}
