use super::{OpMessages, Resource, ResourceService, Updatable};
use crate::endpoints::{documento_categories, documento_search, documento_stats, documento_tags, ResourceKind};
use crate::error::ApiError;
use crate::model::{Documento, DocumentoFilters, DocumentoForm};
use serde_json::Value;

pub struct DocumentoResource;

impl Resource for DocumentoResource {
    type Item = Documento;
    type Create = DocumentoForm;
    type Filters = DocumentoFilters;

    const KIND: ResourceKind = ResourceKind::Documentos;
    const SCOPE: &'static str = "documentos";

    fn id_of(item: &Documento) -> &str {
        &item.id
    }

    fn label_of(item: &Documento) -> &str {
        &item.titulo
    }

    const CREATED: OpMessages = OpMessages {
        success: "Documento criado com sucesso!",
        failure_title: "Erro ao criar documento",
    };
    const DELETED: OpMessages = OpMessages {
        success: "Documento excluído com sucesso!",
        failure_title: "Erro ao excluir documento",
    };

    fn created(label: &str) -> String {
        format!("Documento criado: {}", label)
    }

    fn deleted(id: &str) -> String {
        format!("Documento excluído (ID: {})", id)
    }
}

impl Updatable for DocumentoResource {
    type Update = DocumentoForm;

    const UPDATED: OpMessages = OpMessages {
        success: "Documento atualizado com sucesso!",
        failure_title: "Erro ao atualizar documento",
    };

    fn updated(label: &str) -> String {
        format!("Documento atualizado: {}", label)
    }
}

impl ResourceService<DocumentoResource> {
    /// Full-text search; unpaginated.
    pub async fn search(&self, text: &str) -> Result<Vec<Documento>, ApiError> {
        let query = vec![("q".to_string(), text.to_string())];
        self.http.get(&documento_search(), &query).await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.http.get(&documento_categories(), &[]).await
    }

    pub async fn tags(&self) -> Result<Vec<String>, ApiError> {
        self.http.get(&documento_tags(), &[]).await
    }

    /// Aggregates as reported by the backend; the shape is not fixed.
    pub async fn stats(&self) -> Result<Value, ApiError> {
        self.http.get(&documento_stats(), &[]).await
    }
}
