// src/config.rs

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        DashboardRepository, FleetRepository, NotificationRepository, OrganizationRepository,
        ProjectRepository, TimesheetRepository, UserRepository,
    },
    services::{auth::AuthService, FleetService, ReportService, TimesheetService},
};

// Variáveis de ambiente lidas uma única vez na inicialização
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub fonts_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR inválido")?;

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };

        let fonts_dir = env::var("FONTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./fonts"));

        Ok(Self { database_url, jwt_secret, bind_addr, db_max_connections, fonts_dir })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: Arc<I18nStore>,

    // Serviços (regras de negócio)
    pub auth_service: AuthService,
    pub fleet_service: FleetService,
    pub timesheet_service: TimesheetService,
    pub report_service: ReportService,

    // Repositórios usados direto pelos handlers de leitura
    pub user_repo: UserRepository,
    pub organization_repo: OrganizationRepository,
    pub fleet_repo: FleetRepository,
    pub project_repo: ProjectRepository,
    pub notification_repo: NotificationRepository,
    pub dashboard_repo: DashboardRepository,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let fleet_repo = FleetRepository::new(db_pool.clone());
        let project_repo = ProjectRepository::new(db_pool.clone());
        let timesheet_repo = TimesheetRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            fleet_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let fleet_service = FleetService::new(fleet_repo.clone(), project_repo.clone(), db_pool.clone());
        let timesheet_service = TimesheetService::new(
            timesheet_repo.clone(),
            fleet_repo.clone(),
            project_repo.clone(),
            notification_repo.clone(),
            db_pool.clone(),
        );
        let report_service = ReportService::new(
            timesheet_repo,
            notification_repo.clone(),
            config.fonts_dir.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            fleet_service,
            timesheet_service,
            report_service,
            user_repo,
            organization_repo,
            fleet_repo,
            project_repo,
            notification_repo,
            dashboard_repo,
        }
    }
}
