// src/db/projects_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{db_utils::push_tenant_filter, error::AppError},
    models::{
        projects::{CreateRoutePayload, Project, Route},
        tenancy::TenantFilter,
    },
    services::billing::DEFAULT_KDV_ORANI,
};

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PROJELER
    // =========================================================================

    pub async fn create_project(
        &self,
        organization_id: Uuid,
        name: &str,
        factory_name: Option<&str>,
    ) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name, factory_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(name)
        .bind(factory_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn list_projects(&self, filter: &TenantFilter) -> Result<Vec<Project>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM projects WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        qb.push(" ORDER BY name ASC");

        Ok(qb.build_query_as::<Project>().fetch_all(&self.pool).await?)
    }

    pub async fn find_project(&self, filter: &TenantFilter, id: Uuid) -> Result<Option<Project>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM projects WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_as::<Project>().fetch_optional(&self.pool).await?)
    }

    // =========================================================================
    //  GÜZERGAHLAR (Rotas)
    // =========================================================================

    pub async fn create_route(
        &self,
        organization_id: Uuid,
        payload: &CreateRoutePayload,
    ) -> Result<Route, AppError> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (organization_id, project_id, name, birim_fiyat, fabrika_fiyati, kdv_orani)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(organization_id)
        .bind(payload.project_id)
        .bind(&payload.name)
        .bind(payload.birim_fiyat)
        .bind(payload.fabrika_fiyati)
        .bind(payload.kdv_orani.unwrap_or(DEFAULT_KDV_ORANI))
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    pub async fn list_routes(
        &self,
        filter: &TenantFilter,
        project_id: Option<Uuid>,
    ) -> Result<Vec<Route>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM routes WHERE TRUE");
        push_tenant_filter(&mut qb, filter, "organization_id");
        if let Some(project_id) = project_id {
            qb.push(" AND project_id = ").push_bind(project_id);
        }
        qb.push(" ORDER BY name ASC");

        Ok(qb.build_query_as::<Route>().fetch_all(&self.pool).await?)
    }

    pub async fn find_route<'e, E>(
        &self,
        executor: E,
        filter: &TenantFilter,
        id: Uuid,
    ) -> Result<Option<Route>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM routes WHERE id = ");
        qb.push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");

        Ok(qb.build_query_as::<Route>().fetch_optional(executor).await?)
    }

    // Só mexe no preço de fábrica: o birim_fiyat e os snapshots ficam como estão
    pub async fn update_factory_price(
        &self,
        filter: &TenantFilter,
        id: Uuid,
        fabrika_fiyati: Decimal,
    ) -> Result<Option<Route>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE routes SET fabrika_fiyati = ");
        qb.push_bind(fabrika_fiyati)
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id);
        push_tenant_filter(&mut qb, filter, "organization_id");
        qb.push(" RETURNING *");

        Ok(qb.build_query_as::<Route>().fetch_optional(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::fixtures::seed_timesheet;

    #[sqlx::test]
    async fn routes_of_another_organization_are_invisible(pool: PgPool) {
        let ours = seed_timesheet(&pool, Decimal::from(100), Decimal::from(20)).await.unwrap();
        let theirs = seed_timesheet(&pool, Decimal::from(100), Decimal::from(20)).await.unwrap();
        let repo = ProjectRepository::new(pool.clone());
        let filter = TenantFilter::organization(ours.organization_id);

        let route = repo.find_route(&pool, &filter, ours.route_id).await.unwrap().unwrap();
        assert_eq!(route.project_id, ours.project_id);
        assert!(repo.find_route(&pool, &filter, theirs.route_id).await.unwrap().is_none());
        assert!(repo.find_project(&filter, theirs.project_id).await.unwrap().is_none());

        // O UPDATE também respeita o filtro
        let updated = repo.update_factory_price(&filter, theirs.route_id, Decimal::from(999)).await.unwrap();
        assert!(updated.is_none());
        let untouched = repo
            .find_route(&pool, &TenantFilter::unrestricted(), theirs.route_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.fabrika_fiyati, None);
    }
}
