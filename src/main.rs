//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: nível vem do RUST_LOG (padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login));

    // Todo o resto passa pelo auth_guard, que só reconstrói o Principal.
    // A decisão 401/403 fica nos extratores de cada handler.
    let protected_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        // Administração
        .route("/api/users"
               ,get(handlers::users::list_users)
               .post(handlers::users::create_user)
        )
        .route("/api/organizations"
               ,get(handlers::tenancy::list_organizations)
               .post(handlers::tenancy::create_organization)
        )
        // Frota
        .route("/api/suppliers"
               ,get(handlers::fleet::list_suppliers)
               .post(handlers::fleet::create_supplier)
        )
        .route("/api/vehicles"
               ,get(handlers::fleet::list_vehicles)
               .post(handlers::fleet::create_vehicle)
        )
        .route("/api/drivers"
               ,get(handlers::fleet::list_drivers)
               .post(handlers::fleet::create_driver)
        )
        // Projetos e rotas
        .route("/api/projects"
               ,get(handlers::projects::list_projects)
               .post(handlers::projects::create_project)
        )
        .route("/api/routes"
               ,get(handlers::projects::list_routes)
               .post(handlers::projects::create_route)
        )
        .route("/api/routes/{id}/factory-price", patch(handlers::projects::update_factory_price))
        // Puantaj
        .route("/api/timesheets"
               ,get(handlers::timesheets::list_timesheets)
               .post(handlers::timesheets::create_timesheet)
        )
        .route("/api/timesheets/{id}", get(handlers::timesheets::get_timesheet))
        .route("/api/timesheets/{id}/entries", post(handlers::timesheets::upsert_entry))
        .route("/api/timesheets/{id}/approve", post(handlers::timesheets::approve_timesheet))
        // Relatórios e painel
        .route("/api/reports/factory", get(handlers::reports::factory_report))
        .route("/api/reports/factory/pdf", get(handlers::reports::factory_report_pdf))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        // Notificações e portal
        .route("/api/notifications", get(handlers::notifications::list_notifications))
        .route("/api/notifications/{id}/read", post(handlers::notifications::mark_read))
        .route("/api/portal/timesheets", get(handlers::portal::list_my_timesheets))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::models::auth::{Principal, Role};

    // Pool preguiçoso: as recusas do portão acontecem antes de qualquer consulta
    fn test_state() -> AppState {
        let config = Config {
            database_url: "postgres://localhost/filo_test".to_string(),
            jwt_secret: "segredo-de-teste".to_string(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            db_max_connections: 1,
            fonts_dir: "./fonts".into(),
        };
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        AppState::from_pool(pool, &config)
    }

    fn token_for(state: &AppState, role: Role, organization_id: Option<Uuid>) -> String {
        let principal = Principal {
            user_id: Uuid::new_v4(),
            role,
            organization_id,
            supplier_id: (role == Role::Supplier).then(Uuid::new_v4),
        };
        state.auth_service.create_token(&principal).unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        build_router(state.clone()).oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_with(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let state = test_state();
        let response = send(&state, get_with("/api/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_401_with_error_body() {
        let state = test_state();
        let response = send(&state, get_with("/api/suppliers", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Oturum açmanız gerekiyor.");
    }

    #[tokio::test]
    async fn invalid_token_is_treated_as_anonymous() {
        let state = test_state();
        let response = send(&state, get_with("/api/auth/me", Some("nao-e-um-jwt"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn error_message_follows_accept_language() {
        let state = test_state();
        let request = Request::builder()
            .uri("/api/dashboard/summary")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();

        let body = body_json(send(&state, request).await).await;
        assert_eq!(body["error"], "You need to sign in.");
    }

    #[tokio::test]
    async fn me_returns_the_principal_from_the_token() {
        let state = test_state();
        let org = Uuid::new_v4();
        let token = token_for(&state, Role::Manager, Some(org));

        let response = send(&state, get_with("/api/auth/me", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["role"], "MANAGER");
        assert_eq!(body["organizationId"], org.to_string());
    }

    #[tokio::test]
    async fn plain_user_cannot_edit_factory_price() {
        let state = test_state();
        let token = token_for(&state, Role::User, Some(Uuid::new_v4()));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/routes/{}/factory-price", Uuid::new_v4()))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"fabrikaFiyati":1600.0}"#))
            .unwrap();

        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Fabrika fiyatını düzenleme yetkiniz yok.");
    }

    #[tokio::test]
    async fn plain_user_cannot_generate_factory_report() {
        let state = test_state();
        let token = token_for(&state, Role::User, Some(Uuid::new_v4()));

        let response = send(&state, get_with("/api/reports/factory?yil=2025&ay=3", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn supplier_is_kept_out_of_the_back_office() {
        let state = test_state();
        let token = token_for(&state, Role::Supplier, Some(Uuid::new_v4()));

        for uri in ["/api/suppliers", "/api/timesheets", "/api/dashboard/summary", "/api/users"] {
            let response = send(&state, get_with(uri, Some(&token))).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        }
    }

    #[tokio::test]
    async fn portal_is_only_for_suppliers() {
        let state = test_state();
        let token = token_for(&state, Role::Manager, Some(Uuid::new_v4()));

        let response = send(&state, get_with("/api/portal/timesheets", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_role_is_authenticated_but_denied_everywhere() {
        let state = test_state();
        let token = token_for(&state, Role::Unknown, Some(Uuid::new_v4()));

        let me = send(&state, get_with("/api/auth/me", Some(&token))).await;
        assert_eq!(me.status(), StatusCode::OK);

        for uri in ["/api/projects", "/api/users", "/api/reports/factory?yil=2025&ay=3", "/api/portal/timesheets"] {
            let response = send(&state, get_with(uri, Some(&token))).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
        }
    }

    #[tokio::test]
    async fn organization_admin_cannot_open_new_organizations() {
        let state = test_state();
        let token = token_for(&state, Role::Admin, Some(Uuid::new_v4()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/organizations")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Yeni Lojistik"}"#))
            .unwrap();

        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn creating_a_user_with_an_unrecognized_role_is_400() {
        let state = test_state();
        let token = token_for(&state, Role::Admin, Some(Uuid::new_v4()));

        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT_LANGUAGE, "en")
            .body(Body::from(
                r#"{"email":"x@firma.com.tr","name":"X","password":"123456","role":"SUPERVISOR"}"#,
            ))
            .unwrap();

        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"]["role"][0], "Invalid role. Must be ADMIN, MANAGER, USER or SUPPLIER.");
    }

    #[tokio::test]
    async fn factory_price_beyond_the_column_limit_is_400() {
        let state = test_state();
        let token = token_for(&state, Role::Admin, Some(Uuid::new_v4()));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/routes/{}/factory-price", Uuid::new_v4()))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"fabrikaFiyati":10000000000000.0}"#))
            .unwrap();

        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["details"]["fabrika_fiyati"][0], "Tutar 999.999.999.999,99 değerini aşamaz.");
    }
}
