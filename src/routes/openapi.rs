use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ConsultAI API",
        version = "1.0.0",
        description = "Chatbot backend for Prefeitura de Juiz de Fora municipal services"
    ),
    paths(
        // Health
        super::health::root,
        super::health::health,
        super::health::status,
        // Chat
        super::chat::chat,
    ),
    components(schemas(
        crate::models::requests::ChatRequest,
        crate::models::responses::ChatResponse,
        crate::models::responses::ServiceHealth,
        crate::models::responses::HealthResponse,
        crate::models::responses::StatusResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Health", description = "Health and status endpoints"),
        (name = "Chat", description = "Guarded chat endpoint"),
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/explore").url("/api-docs/openapi.json", ApiDoc::openapi())
}
