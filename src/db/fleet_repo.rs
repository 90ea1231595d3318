// src/db/fleet_repo.rs

use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::push_tenant_filter, error::AppError},
    models::{
        fleet::{CreateDriverPayload, CreateSupplierPayload, CreateVehiclePayload, Driver, Supplier, Vehicle},
        tenancy::TenantFilter,
    },
};

#[derive(Clone)]
pub struct FleetRepository {
    pool: PgPool,
}

impl FleetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TEDARİKÇİLER (Fornecedores)
    // =========================================================================

    pub async fn create_supplier(
        &self,
        organization_id: Uuid,
        payload: &CreateSupplierPayload,
    ) -> Result<Supplier, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (organization_id, name, tax_number, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(&payload.name)
        .bind(&payload.tax_number)
        .bind(&payload.phone)
        .bind(&payload.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn list_suppliers(&self, filter: &TenantFilter) -> Result<Vec<Supplier>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM suppliers WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        qb.push(" ORDER BY name ASC");

        Ok(qb.build_query_as::<Supplier>().fetch_all(&self.pool).await?)
    }

    pub async fn find_supplier<'e, E>(
        &self,
        executor: E,
        filter: &TenantFilter,
        id: Uuid,
    ) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM suppliers WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_as::<Supplier>().fetch_optional(executor).await?)
    }

    // =========================================================================
    //  ARAÇLAR (Veículos)
    // =========================================================================

    pub async fn create_vehicle(
        &self,
        organization_id: Uuid,
        payload: &CreateVehiclePayload,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (organization_id, supplier_id, plate, model, capacity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(payload.supplier_id)
        .bind(payload.plate.trim().to_uppercase())
        .bind(&payload.model)
        .bind(payload.capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn list_vehicles(&self, filter: &TenantFilter) -> Result<Vec<Vehicle>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        qb.push(" ORDER BY plate ASC");

        Ok(qb.build_query_as::<Vehicle>().fetch_all(&self.pool).await?)
    }

    pub async fn find_vehicle(&self, filter: &TenantFilter, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM vehicles WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_as::<Vehicle>().fetch_optional(&self.pool).await?)
    }

    // =========================================================================
    //  ŞOFÖRLER (Motoristas)
    // =========================================================================

    pub async fn create_driver(
        &self,
        organization_id: Uuid,
        payload: &CreateDriverPayload,
    ) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (organization_id, supplier_id, full_name, phone, license_number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(payload.supplier_id)
        .bind(&payload.full_name)
        .bind(&payload.phone)
        .bind(&payload.license_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn list_drivers(&self, filter: &TenantFilter) -> Result<Vec<Driver>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM drivers WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        qb.push(" ORDER BY full_name ASC");

        Ok(qb.build_query_as::<Driver>().fetch_all(&self.pool).await?)
    }

    pub async fn find_driver(&self, filter: &TenantFilter, id: Uuid) -> Result<Option<Driver>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM drivers WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_as::<Driver>().fetch_optional(&self.pool).await?)
    }
}
