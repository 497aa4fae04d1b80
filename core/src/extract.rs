use axum::{
    extract::FromRequest,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// JSON extractor and response whose rejection goes through [`AppError`],
/// so malformed bodies hit the same error boundary as handler failures.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}
