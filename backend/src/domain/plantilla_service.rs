use log::info;
use shared::{ApiMessage, CreatePlantillaUsuarioRequest, CreateTurnoRequest, PlantillaTurnoUsuario, Turno};
use std::sync::Arc;

use crate::domain::error::ServiceError;
use crate::domain::schedule::sort_by_date_and_time;
use crate::domain::session::SessionContext;
use crate::domain::turno_service::validate_slot_request;
use crate::storage::PlantillaStorage;

/// Service for slot templates, all of them staff-only
#[derive(Clone)]
pub struct PlantillaService {
    session: SessionContext,
    plantillas: Arc<dyn PlantillaStorage>,
}

impl PlantillaService {
    pub fn new(session: SessionContext, plantillas: Arc<dyn PlantillaStorage>) -> Self {
        Self { session, plantillas }
    }

    /// Template from which the API generates a month of dated slots
    pub async fn create_template(&self, request: CreateTurnoRequest) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("create templates")?;
        let request = validate_slot_request(request)?;
        let message = self.session.guard(self.plantillas.create_template(&session.token, &request).await)?;
        info!("Created monthly template {} {} at {}", request.dia, request.hora, request.sede);
        Ok(message)
    }

    /// This week's generated slots for a member, ordered by date then time
    pub async fn week_for_user(&self, user_id: &str) -> Result<Vec<Turno>, ServiceError> {
        let session = self.session.require_staff("view members' weeks")?;
        if user_id.trim().is_empty() {
            return Err(ServiceError::Validation("User id is required".to_string()));
        }
        let turnos = self.session.guard(self.plantillas.week_for_user(&session.token, user_id.trim()).await)?;
        Ok(sort_by_date_and_time(turnos))
    }

    pub async fn list_user_templates(&self) -> Result<Vec<PlantillaTurnoUsuario>, ServiceError> {
        let session = self.session.require_staff("view member templates")?;
        self.session.guard(self.plantillas.list_user_templates(&session.token).await)
    }

    pub async fn create_user_template(
        &self,
        request: CreatePlantillaUsuarioRequest,
    ) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("create member templates")?;
        if request.usuario.trim().is_empty() {
            return Err(ServiceError::Validation("A user is required".to_string()));
        }
        // Same shape as a slot, minus the seat count
        let slot = validate_slot_request(CreateTurnoRequest {
            sede: request.sede,
            nivel: request.nivel,
            dia: request.dia,
            hora: request.hora,
            cupos_disponibles: 1,
        })?;
        let request = CreatePlantillaUsuarioRequest {
            usuario: request.usuario.trim().to_string(),
            dia: slot.dia,
            hora: slot.hora,
            sede: slot.sede,
            nivel: slot.nivel,
        };

        let message = self.session.guard(self.plantillas.create_user_template(&session.token, &request).await)?;
        info!("Created template {} {} for user {}", request.dia, request.hora, request.usuario);
        Ok(message)
    }

    pub async fn delete_user_template(&self, template_id: &str) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("delete member templates")?;
        if template_id.trim().is_empty() {
            return Err(ServiceError::Validation("Template id is required".to_string()));
        }
        self.session
            .guard(self.plantillas.delete_user_template(&session.token, template_id).await)
            .map_err(|e| e.or_not_found(|| format!("Template {}", template_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::test_user;
    use crate::storage::test_utils::{token_for, turno, FakeAstros};
    use shared::Role;

    fn setup(role: Role) -> (PlantillaService, Arc<FakeAstros>) {
        let fake = Arc::new(
            FakeAstros::new()
                .with_user(test_user("prof", Role::Profesor), "x")
                .with_user(test_user("ana", Role::Azul), "x"),
        );
        let user_id = if role.is_staff() { "prof" } else { "ana" };
        let session = SessionContext::in_memory();
        session.establish(token_for(user_id), test_user(user_id, role));
        (PlantillaService::new(session, fake.clone()), fake)
    }

    fn template(usuario: &str) -> CreatePlantillaUsuarioRequest {
        CreatePlantillaUsuarioRequest {
            usuario: usuario.to_string(),
            dia: "Viernes".to_string(),
            hora: "18:30".to_string(),
            sede: "Fulgor".to_string(),
            nivel: "Blanco".to_string(),
        }
    }

    #[tokio::test]
    async fn test_week_for_user_sorted_by_date() {
        let (service, fake) = setup(Role::Profesor);
        fake.state().week_slots.insert(
            "ana".to_string(),
            vec![
                turno("mie", "Miércoles", "08:00", Some("2024-02-14")),
                turno("lun-pm", "Lunes", "20:00", Some("2024-02-12")),
                turno("lun-am", "Lunes", "09:00", Some("2024-02-12")),
            ],
        );

        let ids: Vec<String> = service.week_for_user("ana").await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["lun-am", "lun-pm", "mie"]);
    }

    #[tokio::test]
    async fn test_user_template_lifecycle() {
        let (service, _fake) = setup(Role::Profesor);

        service.create_user_template(template("ana")).await.unwrap();
        let templates = service.list_user_templates().await.unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].usuario, "ana");

        service.delete_user_template(&templates[0].id).await.unwrap();
        assert!(service.list_user_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_template_validation() {
        let (service, _fake) = setup(Role::Profesor);

        let mut bad = template("ana");
        bad.hora = "tarde".to_string();
        assert!(matches!(service.create_user_template(bad).await, Err(ServiceError::Validation(_))));
        assert!(matches!(service.create_user_template(template(" ")).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_students_cannot_use_templates() {
        let (service, _fake) = setup(Role::Violeta);
        assert!(matches!(service.list_user_templates().await, Err(ServiceError::Forbidden { .. })));
        assert!(matches!(service.week_for_user("ana").await, Err(ServiceError::Forbidden { .. })));
    }
}
