use super::{string_or_number, QueryFilters};
use crate::error::ValidationErrors;
use crate::http::{push_query, QueryPairs};
use crate::validation::{TextRule, Validate};
use serde::{Deserialize, Serialize};

/// Document of the document store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documento {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub titulo: String,
    pub conteudo: String,
    pub categoria: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub autor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_atualizacao: Option<String>,
}

/// Full payload for both create and update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentoForm {
    pub titulo: String,
    pub conteudo: String,
    pub categoria: String,
    pub tags: Vec<String>,
    pub autor: String,
}

impl From<&Documento> for DocumentoForm {
    fn from(d: &Documento) -> Self {
        DocumentoForm {
            titulo: d.titulo.clone(),
            conteudo: d.conteudo.clone(),
            categoria: d.categoria.clone(),
            tags: d.tags.clone(),
            autor: d.autor.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentoFilters {
    pub titulo: Option<String>,
    pub categoria: Option<String>,
    pub autor: Option<String>,
    pub tag: Option<String>,
}

impl QueryFilters for DocumentoFilters {
    fn to_query(&self) -> QueryPairs {
        let mut q = QueryPairs::new();
        push_query(&mut q, "titulo", self.titulo.as_deref());
        push_query(&mut q, "categoria", self.categoria.as_deref());
        push_query(&mut q, "autor", self.autor.as_deref());
        push_query(&mut q, "tag", self.tag.as_deref());
        q
    }
}

const TITULO: TextRule = TextRule {
    min: 3,
    max: 200,
    too_short: "Título deve ter no mínimo 3 caracteres",
    too_long: "Título deve ter no máximo 200 caracteres",
};

const CONTEUDO: TextRule = TextRule {
    min: 10,
    max: 10_000,
    too_short: "Conteúdo deve ter no mínimo 10 caracteres",
    too_long: "Conteúdo deve ter no máximo 10.000 caracteres",
};

const CATEGORIA: TextRule = TextRule {
    min: 2,
    max: 50,
    too_short: "Categoria deve ter no mínimo 2 caracteres",
    too_long: "Categoria deve ter no máximo 50 caracteres",
};

const AUTOR: TextRule = TextRule {
    min: 3,
    max: 100,
    too_short: "Nome do autor deve ter no mínimo 3 caracteres",
    too_long: "Nome do autor deve ter no máximo 100 caracteres",
};

const MAX_TAGS: usize = 10;

impl Validate for DocumentoForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        TITULO.check(&mut errors, "titulo", &self.titulo);
        CONTEUDO.check(&mut errors, "conteudo", &self.conteudo);
        CATEGORIA.check(&mut errors, "categoria", &self.categoria);
        AUTOR.check(&mut errors, "autor", &self.autor);
        if self.tags.is_empty() {
            errors.add("tags", "Adicione pelo menos uma tag");
        } else if self.tags.len() > MAX_TAGS {
            errors.add("tags", "Máximo de 10 tags");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> DocumentoForm {
        DocumentoForm {
            titulo: "Guia de índices".into(),
            conteudo: "Como criar índices compostos.".into(),
            categoria: "banco".into(),
            tags: vec!["mongo".into()],
            autor: "Bruno".into(),
        }
    }

    #[test]
    fn accepts_mongo_style_ids() {
        let d: Documento = serde_json::from_value(json!({
            "_id": "65f0c2", "titulo": "t", "conteudo": "c", "categoria": "x", "autor": "a",
            "dataCriacao": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(d.id, "65f0c2");
        assert!(d.tags.is_empty());
        assert_eq!(d.data_criacao.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn tag_count_bounds() {
        assert!(form().validate().is_ok());
        let mut f = form();
        f.tags.clear();
        assert_eq!(f.validate().unwrap_err().field("tags"), ["Adicione pelo menos uma tag".to_string()]);
        f.tags = (0..11).map(|i| format!("t{}", i)).collect();
        assert_eq!(f.validate().unwrap_err().field("tags"), ["Máximo de 10 tags".to_string()]);
    }

    #[test]
    fn short_fields_report_each_field() {
        let f = DocumentoForm {
            titulo: "ab".into(),
            conteudo: "curto".into(),
            ..form()
        };
        let errors = f.validate().unwrap_err();
        assert_eq!(errors.fields().count(), 2);
    }
}
