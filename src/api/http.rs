// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::api::handlers::{
    ApiHandlers, ApiResponse, ApiResult, CatalogQuery, InstallArchiveRequest, InstallModRequest, SearchQuery,
};
use crate::downloader::CatalogMod;
use crate::ledger::InstalledMod;
use crate::mod_installer::ModInstallationService;

pub struct HttpServer {
    handlers: ApiHandlers,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(installer: Arc<ModInstallationService>, addr: SocketAddr) -> Self {
        Self {
            handlers: ApiHandlers::new(installer),
            addr,
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let app = router(Arc::new(self.handlers));

        info!(addr = %self.addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

        Ok(())
    }
}

pub fn router(handlers: Arc<ApiHandlers>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/catalog", get(list_catalog_handler))
        .route("/api/catalog/search", get(search_catalog_handler))
        .route("/api/mods", get(list_mods_handler))
        .route("/api/mods/install", post(install_mod_handler))
        .route("/api/mods/install-archive", post(install_archive_handler))
        .route("/api/mods/uninstall/:id", post(uninstall_mod_handler))
        .route("/api/gameinfo/patch", post(patch_gameinfo_handler))
        .with_state(handlers)
}

async fn health_handler() -> Json<ApiResponse<&'static str>> {
    ApiHandlers::health().await
}

async fn list_catalog_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    query: Query<CatalogQuery>,
) -> ApiResult<Vec<CatalogMod>> {
    handlers.list_catalog(query).await
}

async fn search_catalog_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    query: Query<SearchQuery>,
) -> ApiResult<Vec<CatalogMod>> {
    handlers.search_catalog(query).await
}

async fn list_mods_handler(State(handlers): State<Arc<ApiHandlers>>) -> ApiResult<Vec<InstalledMod>> {
    handlers.list_mods().await
}

async fn install_mod_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    request: Json<InstallModRequest>,
) -> ApiResult<InstalledMod> {
    handlers.install_mod(request).await
}

async fn install_archive_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    request: Json<InstallArchiveRequest>,
) -> ApiResult<InstalledMod> {
    handlers.install_archive(request).await
}

async fn uninstall_mod_handler(
    State(handlers): State<Arc<ApiHandlers>>,
    id: Path<i64>,
) -> ApiResult<Vec<InstalledMod>> {
    handlers.uninstall_mod(id).await
}

async fn patch_gameinfo_handler(State(handlers): State<Arc<ApiHandlers>>) -> ApiResult<bool> {
    handlers.patch_gameinfo().await
}
