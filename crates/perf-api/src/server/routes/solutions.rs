async fn list_solutions(State(state): State<AppState>) -> Json<Vec<SolutionEntry>> {
    let mut api = state.inner.lock().await;
    Json(api.solutions())
}

async fn get_solution(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SolutionEntry>, HttpApiError> {
    let mut api = state.inner.lock().await;
    api.solution(&id)
        .map(Json)
        .map_err(HttpApiError::from_failure)
}

async fn get_scenarios() -> Json<ScenarioDomain> {
    Json(ScenarioDomain::default())
}
