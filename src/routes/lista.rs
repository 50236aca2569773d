//! Status and administrative list routes.
//!
//! `DELETE /lista` clears without going through the confirmation gate. It is
//! a maintenance path, not something either assistant channel exposes.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use tracing::info;

use crate::services::list::ShoppingListEntry;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub productos: usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub productos: Vec<ShoppingListEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: &'static str,
    pub eliminados: usize,
    pub productos: Vec<ShoppingListEntry>,
}

/// `GET /`: liveness plus current list size.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK",
        message: "Servicio de lista de compras funcionando",
        productos: state.store.size(),
    })
}

/// `GET /lista`: raw entries, oldest first.
pub async fn list_entries(State(state): State<AppState>) -> Json<ListResponse> {
    let productos = state.store.snapshot();
    Json(ListResponse { total: productos.len(), productos })
}

/// `DELETE /lista`: unconditional clear; the chat is told the list is now empty.
pub async fn clear_entries(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.store.clear();
    info!(removed, "shopping list cleared via admin route");
    state.dispatcher.notify_mutation(Vec::new());
    Json(ClearResponse { message: "Lista limpiada", eliminados: removed, productos: Vec::new() })
}

#[cfg(test)]
#[path = "lista_test.rs"]
mod tests;
