async fn health(State(state): State<AppState>) -> Json<Value> {
    let api = state.inner.lock().await;
    Json(json!({
        "status": "ok",
        "storeAttached": api.has_store(),
        "storeCurrent": api.store_is_current(),
        "solutions": api.catalog().optimizations().count(),
        "lastPersistenceError": api.last_persistence_error(),
    }))
}

async fn init_store(State(state): State<AppState>) -> Result<Json<InitSummary>, HttpApiError> {
    let mut api = state.inner.lock().await;
    api.initialize_storage()
        .map(Json)
        .map_err(HttpApiError::from_persistence)
}

async fn not_found(uri: axum::http::Uri) -> HttpApiError {
    HttpApiError::route_not_found(uri.path())
}
