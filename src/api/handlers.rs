// SPDX-License-Identifier: GPL-3.0-only
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::downloader::CatalogMod;
use crate::ledger::InstalledMod;
use crate::mod_installer::{InstallError, ModDetails, ModInstallationService};

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallModRequest {
    pub mod_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallArchiveRequest {
    pub archive_path: PathBuf,
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// HTTP status for a failed service call
pub fn error_status(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<InstallError>() {
        Some(InstallError::UnsupportedFormat { .. } | InstallError::PayloadNotFound { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Some(InstallError::TooManyVariants { .. }) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(error: anyhow::Error, what: &str) -> ApiError {
    let status = error_status(&error);
    error!(error = %format!("{:#}", error), status = status.as_u16(), "{}", what);
    (status, Json(ApiResponse::error(format!("{:#}", error))))
}

pub struct ApiHandlers {
    installer: Arc<ModInstallationService>,
}

impl ApiHandlers {
    pub fn new(installer: Arc<ModInstallationService>) -> Self {
        Self { installer }
    }
}

impl ApiHandlers {
    pub async fn health() -> Json<ApiResponse<&'static str>> {
        Json(ApiResponse::success("ok"))
    }

    pub async fn list_catalog(&self, Query(query): Query<CatalogQuery>) -> ApiResult<Vec<CatalogMod>> {
        let page = query.page.unwrap_or(1);
        match self.installer.catalog().fetch_mods(page).await {
            Ok(mods) => Ok(Json(ApiResponse::success(mods))),
            Err(e) => Err(failure(e, "Failed to fetch catalog")),
        }
    }

    pub async fn search_catalog(&self, Query(query): Query<SearchQuery>) -> ApiResult<Vec<CatalogMod>> {
        match self.installer.catalog().search_mods(&query.q).await {
            Ok(mods) => Ok(Json(ApiResponse::success(mods))),
            Err(e) => Err(failure(e, "Failed to search catalog")),
        }
    }

    pub async fn list_mods(&self) -> ApiResult<Vec<InstalledMod>> {
        match self.installer.installed_mods().await {
            Ok(mods) => Ok(Json(ApiResponse::success(mods))),
            Err(e) => Err(failure(e, "Failed to list installed mods")),
        }
    }

    pub async fn install_mod(&self, Json(request): Json<InstallModRequest>) -> ApiResult<InstalledMod> {
        info!(mod_id = request.mod_id, "Install mod request received");

        match self.installer.install_from_catalog(request.mod_id).await {
            Ok(record) => Ok(Json(ApiResponse::success(record))),
            Err(e) => Err(failure(e, "Failed to install mod")),
        }
    }

    pub async fn install_archive(&self, Json(request): Json<InstallArchiveRequest>) -> ApiResult<InstalledMod> {
        info!(archive = %request.archive_path.display(), mod_id = request.id, "Install archive request received");

        let details = ModDetails {
            id: request.id,
            name: request.name,
            image_url: request.image_url,
        };
        match self.installer.install_archive(&request.archive_path, details).await {
            Ok(record) => Ok(Json(ApiResponse::success(record))),
            Err(e) => Err(failure(e, "Failed to install archive")),
        }
    }

    pub async fn uninstall_mod(&self, Path(id): Path<i64>) -> ApiResult<Vec<InstalledMod>> {
        match self.installer.uninstall(id).await {
            Ok(removed) if removed.is_empty() => {
                warn!(mod_id = id, "Uninstall requested for unknown mod");
                Err((
                    StatusCode::NOT_FOUND,
                    Json(ApiResponse::error(format!("Mod {} is not installed", id))),
                ))
            }
            Ok(removed) => Ok(Json(ApiResponse::success(removed))),
            Err(e) => Err(failure(e, "Failed to uninstall mod")),
        }
    }

    pub async fn patch_gameinfo(&self) -> ApiResult<bool> {
        match self.installer.patch_gameinfo().await {
            Ok(changed) => Ok(Json(ApiResponse::success(changed))),
            Err(e) => Err(failure(e, "Failed to patch gameinfo.gi")),
        }
    }
}
