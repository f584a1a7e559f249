#[derive(Debug, Error)]
pub enum ServerError {
    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to close metrics store: {0}")]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug)]
struct HttpApiError {
    status: StatusCode,
    error: ApiError,
}

impl HttpApiError {
    fn invalid_scenario(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(ErrorCode::InvalidScenario, message, details),
        }
    }

    fn invalid_request(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(ErrorCode::InvalidRequest, message, details),
        }
    }

    fn solution_not_found(solution_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                ErrorCode::SolutionNotFound,
                "solution not found",
                Some(format!("solution_id={solution_id}")),
            ),
        }
    }

    fn route_not_found(path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                ErrorCode::InvalidRequest,
                "no such route",
                Some(format!("path={path}")),
            ),
        }
    }

    fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new(ErrorCode::InternalError, message, details),
        }
    }

    fn from_failure(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::InvalidScenario(err) => Self::invalid_scenario(
                format!("invalid {}", err.dimension.field_name()),
                Some(err.to_string()),
            ),
            ApiFailure::BlankSolutionId => {
                Self::invalid_request("solutionId must not be blank", None)
            }
            ApiFailure::SolutionNotFound(solution_id) => Self::solution_not_found(&solution_id),
            ApiFailure::Persistence(err) => Self::from_persistence(err),
        }
    }

    fn from_persistence(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotAttached => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::new(
                    ErrorCode::PersistenceUnavailable,
                    "metrics store is not attached",
                    None,
                ),
            },
            other => Self::internal("persistence operation failed", Some(other.to_string())),
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
