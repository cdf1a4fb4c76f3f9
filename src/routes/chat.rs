use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppError;
use crate::models::requests::ChatRequest;
use crate::models::responses::ChatResponse;
use crate::services::responder;

// POST /chat
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, body = ChatResponse, description = "Assistant reply, guardrail rejection, or degraded apology"),
        (status = 400, body = crate::error::ErrorBody, description = "Missing message"),
    ),
    tag = "Chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    // A missing or blank message is the only non-200 outcome; everything
    // else, guardrail rejections included, is a normal 200 reply.
    let message = body
        .message_text()
        .ok_or_else(|| AppError::bad_request("Nenhuma mensagem fornecida"))?;

    let response = responder::respond(
        &state.generation,
        state.settings.max_response_chars,
        message,
        body.language.as_deref(),
    )
    .await;

    Ok(Json(ChatResponse { response }))
}
