use super::{string_or_number, QueryFilters};
use crate::error::ValidationErrors;
use crate::http::{push_query, QueryPairs};
use crate::validation::{is_valid_email, RangeRule, TextRule, Validate};
use serde::{Deserialize, Serialize};

/// Row of the relational store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nome: String,
    pub email: String,
    pub idade: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateUsuario {
    pub nome: String,
    pub email: String,
    pub idade: u32,
}

impl CreateUsuario {
    pub fn new(nome: impl Into<String>, email: impl Into<String>, idade: u32) -> Self {
        CreateUsuario {
            nome: nome.into(),
            email: email.into(),
            idade,
        }
        .normalized()
    }

    /// Trimmed name, trimmed lower-case email.
    pub fn normalized(self) -> Self {
        CreateUsuario {
            nome: self.nome.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            idade: self.idade,
        }
    }
}

/// Partial update; only present fields are sent and validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUsuario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idade: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsuarioFilters {
    /// Matches name or email.
    pub search: Option<String>,
    pub idade_min: Option<u32>,
    pub idade_max: Option<u32>,
}

impl QueryFilters for UsuarioFilters {
    fn to_query(&self) -> QueryPairs {
        let mut q = QueryPairs::new();
        push_query(&mut q, "search", self.search.as_deref());
        push_query(&mut q, "idadeMin", self.idade_min);
        push_query(&mut q, "idadeMax", self.idade_max);
        q
    }
}

const NOME: TextRule = TextRule {
    min: 2,
    max: 100,
    too_short: "Nome deve ter no mínimo 2 caracteres",
    too_long: "Nome deve ter no máximo 100 caracteres",
};

const EMAIL: TextRule = TextRule {
    min: 5,
    max: 100,
    too_short: "Email deve ter no mínimo 5 caracteres",
    too_long: "Email deve ter no máximo 100 caracteres",
};

const IDADE: RangeRule = RangeRule {
    min: 1,
    max: 150,
    too_small: "Idade deve ser maior que 0",
    too_large: "Idade deve ser menor que 150",
};

fn check_nome(errors: &mut ValidationErrors, nome: &str) {
    NOME.check(errors, "nome", nome.trim());
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if !is_valid_email(email) {
        errors.add("email", "Email inválido");
    }
    EMAIL.check(errors, "email", email);
}

impl Validate for CreateUsuario {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_nome(&mut errors, &self.nome);
        check_email(&mut errors, &self.email);
        IDADE.check(&mut errors, "idade", i64::from(self.idade));
        errors.into_result()
    }
}

impl Validate for UpdateUsuario {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(nome) = &self.nome {
            check_nome(&mut errors, nome);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        if let Some(idade) = self.idade {
            IDADE.check(&mut errors, "idade", i64::from(idade));
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_numeric_ids_and_camel_case_timestamps() {
        let u: Usuario = serde_json::from_value(json!({
            "id": 7, "nome": "Ana", "email": "ana@example.com", "idade": 30,
            "createdAt": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(u.id, "7");
        assert_eq!(u.created_at.as_deref(), Some("2024-05-01T10:00:00"));
        assert!(u.updated_at.is_none());
    }

    #[test]
    fn create_form_is_normalized_and_validated() {
        let form = CreateUsuario::new("  Ana ", " ANA@Example.com ", 30);
        assert_eq!(form.nome, "Ana");
        assert_eq!(form.email, "ana@example.com");
        assert!(form.validate().is_ok());

        let errors = CreateUsuario::new("A", "nope", 0).validate().unwrap_err();
        assert_eq!(errors.field("nome"), ["Nome deve ter no mínimo 2 caracteres".to_string()]);
        assert!(errors.field("email").contains(&"Email inválido".to_string()));
        assert_eq!(errors.field("idade"), ["Idade deve ser maior que 0".to_string()]);
    }

    #[test]
    fn update_form_checks_only_present_fields() {
        assert!(UpdateUsuario::default().validate().is_ok());
        let update = UpdateUsuario {
            idade: Some(200),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert_eq!(errors.fields().count(), 1);
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "idade": 200 }));
    }

    #[test]
    fn filters_omit_blank_values() {
        let filters = UsuarioFilters {
            search: Some("   ".into()),
            idade_min: Some(18),
            idade_max: None,
        };
        assert_eq!(filters.to_query(), vec![("idadeMin".to_string(), "18".to_string())]);
    }
}
