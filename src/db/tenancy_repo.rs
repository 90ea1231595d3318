// src/db/tenancy_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use crate::common::{db_utils::push_tenant_filter, error::AppError};
use crate::models::tenancy::{Organization, TenantFilter};

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_organization(
        &self,
        name: &str,
        tax_number: Option<&str>,
    ) -> Result<Organization, AppError> {
        let org = sqlx::query_as::<_, Organization>(
            "INSERT INTO organizations (name, tax_number) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(tax_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(org)
    }

    // Aqui a "organização" do registro é o próprio id
    pub async fn list_organizations(&self, filter: &TenantFilter) -> Result<Vec<Organization>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM organizations WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "id");
        qb.push(" ORDER BY name ASC");

        Ok(qb.build_query_as::<Organization>().fetch_all(&self.pool).await?)
    }
}
