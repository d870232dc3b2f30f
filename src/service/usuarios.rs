use super::{OpMessages, Resource, ResourceService, Updatable};
use crate::endpoints::{usuario_email_exists, ResourceKind};
use crate::http::{push_query, QueryPairs};
use crate::model::{CreateUsuario, UpdateUsuario, Usuario, UsuarioFilters};
use serde::Deserialize;

pub struct UsuarioResource;

impl Resource for UsuarioResource {
    type Item = Usuario;
    type Create = CreateUsuario;
    type Filters = UsuarioFilters;

    const KIND: ResourceKind = ResourceKind::Usuarios;
    const SCOPE: &'static str = "usuarios";

    fn id_of(item: &Usuario) -> &str {
        &item.id
    }

    fn label_of(item: &Usuario) -> &str {
        &item.nome
    }

    const CREATED: OpMessages = OpMessages {
        success: "Usuário criado com sucesso!",
        failure_title: "Erro ao criar usuário",
    };
    const DELETED: OpMessages = OpMessages {
        success: "Usuário excluído com sucesso!",
        failure_title: "Erro ao excluir usuário",
    };

    fn created(label: &str) -> String {
        format!("Usuário \"{}\" criado", label)
    }

    fn deleted(id: &str) -> String {
        format!("Usuário excluído (ID: {})", id)
    }
}

impl Updatable for UsuarioResource {
    type Update = UpdateUsuario;

    const UPDATED: OpMessages = OpMessages {
        success: "Usuário atualizado com sucesso!",
        failure_title: "Erro ao atualizar usuário",
    };

    fn updated(label: &str) -> String {
        format!("Usuário \"{}\" atualizado", label)
    }
}

#[derive(Deserialize)]
struct EmailExists {
    exists: bool,
}

impl ResourceService<UsuarioResource> {
    /// Whether another usuario already uses `email`. Any failure reads as
    /// "not taken"; the backend still enforces uniqueness on write.
    pub async fn email_exists(&self, email: &str, exclude_id: Option<&str>) -> bool {
        let mut query = QueryPairs::new();
        push_query(&mut query, "email", Some(email));
        push_query(&mut query, "excludeId", exclude_id);
        match self.http.get::<EmailExists>(&usuario_email_exists(), &query).await {
            Ok(r) => r.exists,
            Err(e) => {
                tracing::warn!(email, error = %e, "email check failed, assuming free");
                false
            }
        }
    }
}
