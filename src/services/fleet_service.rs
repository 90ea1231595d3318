// src/services/fleet_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FleetRepository, ProjectRepository},
    models::{
        auth::Principal,
        fleet::{CreateDriverPayload, CreateSupplierPayload, CreateVehiclePayload, Driver, Supplier, Vehicle},
        projects::{CreateProjectPayload, CreateRoutePayload, Project, Route},
        tenancy::TenantFilter,
    },
    services::authz::{self, AuthzError, ForbiddenReason},
};

/// Cadastros da frota e dos projetos.
/// Toda escrita resolve a organização pelo portão antes de tocar no banco.
#[derive(Clone)]
pub struct FleetService {
    fleet_repo: FleetRepository,
    project_repo: ProjectRepository,
    pool: PgPool,
}

impl FleetService {
    pub fn new(fleet_repo: FleetRepository, project_repo: ProjectRepository, pool: PgPool) -> Self {
        Self { fleet_repo, project_repo, pool }
    }

    pub async fn create_supplier(
        &self,
        filter: &TenantFilter,
        payload: &CreateSupplierPayload,
    ) -> Result<Supplier, AppError> {
        let org = authz::resolve_organization(filter, payload.organization_id)?;
        self.fleet_repo.create_supplier(org, payload).await
    }

    // O fornecedor (se houver) tem que ser da mesma organização do veículo
    async fn check_supplier(&self, org: Uuid, supplier_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(id) = supplier_id {
            self.fleet_repo
                .find_supplier(&self.pool, &TenantFilter::organization(org), id)
                .await?
                .ok_or_else(|| AppError::ResourceNotFound(format!("Tedarikçi {}", id)))?;
        }
        Ok(())
    }

    pub async fn create_vehicle(
        &self,
        filter: &TenantFilter,
        payload: &CreateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        let org = authz::resolve_organization(filter, payload.organization_id)?;
        self.check_supplier(org, payload.supplier_id).await?;
        self.fleet_repo.create_vehicle(org, payload).await
    }

    pub async fn create_driver(
        &self,
        filter: &TenantFilter,
        payload: &CreateDriverPayload,
    ) -> Result<Driver, AppError> {
        let org = authz::resolve_organization(filter, payload.organization_id)?;
        self.check_supplier(org, payload.supplier_id).await?;
        self.fleet_repo.create_driver(org, payload).await
    }

    pub async fn create_project(
        &self,
        filter: &TenantFilter,
        payload: &CreateProjectPayload,
    ) -> Result<Project, AppError> {
        let org = authz::resolve_organization(filter, payload.organization_id)?;
        self.project_repo
            .create_project(org, payload.name.trim(), payload.factory_name.as_deref())
            .await
    }

    /// A rota herda a organização do projeto. Definir preço de fábrica já na
    /// criação exige a mesma permissão da edição.
    pub async fn create_route(
        &self,
        principal: &Principal,
        filter: &TenantFilter,
        payload: &CreateRoutePayload,
    ) -> Result<Route, AppError> {
        if payload.fabrika_fiyati.is_some() && !authz::can_edit_factory_price(principal.role) {
            return Err(AuthzError::Forbidden(ForbiddenReason::FactoryPriceEdit).into());
        }

        let project = self.project_repo
            .find_project(filter, payload.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Proje {}", payload.project_id)))?;

        self.project_repo.create_route(project.organization_id, payload).await
    }
}
