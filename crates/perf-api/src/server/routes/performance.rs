async fn compare_performance(
    State(state): State<AppState>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Result<Response, HttpApiError> {
    let Json(request) = payload.map_err(|rejection| {
        HttpApiError::invalid_request("malformed comparison request", Some(rejection.body_text()))
    })?;

    let outcome = {
        let mut api = state.inner.lock().await;
        api.compare(&request).map_err(HttpApiError::from_failure)?
    };

    Ok((
        [source_header(outcome.source)],
        Json(outcome.comparison),
    )
        .into_response())
}
