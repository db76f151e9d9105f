//! Function plot handler.

use axum::Json;

use tutor_core::plot::render_function_plot;
use tutor_core::Block;

use super::run_blocking;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::plot::PlotRequest;

/// `POST /api/plot`
pub async fn plot(ApiJson(req): ApiJson<PlotRequest>) -> Result<Json<Block>, ApiError> {
    let (x_min, x_max) = req.domain()?;
    tracing::debug!(text = %req.text, x_min, x_max, "plot requested");
    let block = run_blocking(move || render_function_plot(&req.text, x_min, x_max)).await??;
    Ok(Json(block))
}
