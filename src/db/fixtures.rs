// src/db/fixtures.rs

// Dados mínimos para os testes com banco (`#[sqlx::test]`)

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct SeededTimesheet {
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub route_id: Uuid,
    pub timesheet_id: Uuid,
}

/// Organização com um projeto, uma rota e um puantaj DRAFT de 2025/03.
pub async fn seed_timesheet(
    pool: &PgPool,
    birim_fiyat: Decimal,
    kdv_orani: Decimal,
) -> Result<SeededTimesheet, sqlx::Error> {
    let organization_id: Uuid =
        sqlx::query_scalar("INSERT INTO organizations (name) VALUES ('Anadolu Lojistik') RETURNING id")
            .fetch_one(pool)
            .await?;

    let project_id: Uuid = sqlx::query_scalar(
        "INSERT INTO projects (organization_id, name, factory_name) VALUES ($1, 'Gebze Servis', 'Arçelik') RETURNING id",
    )
    .bind(organization_id)
    .fetch_one(pool)
    .await?;

    let route_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO routes (organization_id, project_id, name, birim_fiyat, kdv_orani)
        VALUES ($1, $2, 'Kadıköy - Gebze', $3, $4)
        RETURNING id
        "#,
    )
    .bind(organization_id)
    .bind(project_id)
    .bind(birim_fiyat)
    .bind(kdv_orani)
    .fetch_one(pool)
    .await?;

    let vehicle_id: Uuid = sqlx::query_scalar(
        "INSERT INTO vehicles (organization_id, plate) VALUES ($1, '34 ABC 123') RETURNING id",
    )
    .bind(organization_id)
    .fetch_one(pool)
    .await?;

    let user_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (organization_id, email, name, role, password_hash)
        VALUES ($1, $2, 'Operasyon', 'MANAGER', 'x')
        RETURNING id
        "#,
    )
    .bind(organization_id)
    .bind(format!("operasyon-{}@firma.com.tr", Uuid::new_v4()))
    .fetch_one(pool)
    .await?;

    let timesheet_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO timesheets (organization_id, project_id, vehicle_id, yil, ay, created_by)
        VALUES ($1, $2, $3, 2025, 3, $4)
        RETURNING id
        "#,
    )
    .bind(organization_id)
    .bind(project_id)
    .bind(vehicle_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(SeededTimesheet { organization_id, project_id, route_id, timesheet_id })
}

/// Muda o preço e o KDV da rota, como faria uma edição posterior.
pub async fn reprice_route(
    pool: &PgPool,
    route_id: Uuid,
    birim_fiyat: Decimal,
    kdv_orani: Decimal,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE routes SET birim_fiyat = $1, kdv_orani = $2, updated_at = NOW() WHERE id = $3")
        .bind(birim_fiyat)
        .bind(kdv_orani)
        .bind(route_id)
        .execute(pool)
        .await?;
    Ok(())
}
