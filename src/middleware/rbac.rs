// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::auth::{current_principal, reject},
    models::auth::Principal,
    services::authz::{self, AuthzError},
};

/// 1. O Trait que define o que é uma Permissão.
/// Cada permissão aponta para uma guarda do portão de autorização.
pub trait PermissionDef: Send + Sync + 'static {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError>;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T> {
    pub principal: Principal,
    _perm: PhantomData<T>,
}

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let checked = T::check(current_principal(parts)).cloned();

        match checked {
            Ok(principal) => Ok(RequirePermission { principal, _perm: PhantomData }),
            Err(err) => {
                tracing::debug!("Acesso recusado: {}", err);
                Err(reject(parts, state, err).await)
            }
        }
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermBackOffice;
impl PermissionDef for PermBackOffice {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
        authz::require_back_office(principal)
    }
}

pub struct PermAdmin;
impl PermissionDef for PermAdmin {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
        authz::require_admin(principal)
    }
}

pub struct PermFactoryPriceEdit;
impl PermissionDef for PermFactoryPriceEdit {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
        authz::require_factory_price_edit(principal)
    }
}

pub struct PermFactoryReport;
impl PermissionDef for PermFactoryReport {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
        authz::require_factory_report(principal)
    }
}

pub struct PermTimesheetApproval;
impl PermissionDef for PermTimesheetApproval {
    fn check(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
        authz::require_timesheet_approval(principal)
    }
}

pub type BackOfficeUser = RequirePermission<PermBackOffice>;
pub type AdminUser = RequirePermission<PermAdmin>;
pub type FactoryPriceEditor = RequirePermission<PermFactoryPriceEdit>;
pub type FactoryReporter = RequirePermission<PermFactoryReport>;
pub type TimesheetApprover = RequirePermission<PermTimesheetApproval>;
