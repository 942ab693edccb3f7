use crate::agent::ChatAgent;
use crate::error::ChatError;
use crate::media::MediaIngestor;
use crate::models::api::{
    ErrorResponse,
    ModelsResponse,
    SendMessageRequest,
    SendMessageResponse,
    StartConversationRequest,
    StartConversationResponse,
    UploadMediaResponse,
};
use crate::models::chat::Conversation;
use crate::server::page::render_index;

use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    body::Bytes,
    extract::{ DefaultBodyLimit, Multipart, Path, State },
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    response::{ Html, IntoResponse, Response },
    http::StatusCode,
};
use tower::ServiceBuilder;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

pub const UPLOAD_SUCCESS_STATUS: &str = "Media uploaded successfully.";

#[derive(Clone)]
pub struct AppState {
    pub agent: ChatAgent,
    pub media: MediaIngestor,
    index_html: Arc<str>,
}

impl AppState {
    pub fn new(agent: ChatAgent, media: MediaIngestor) -> Self {
        let index_html = render_index(agent.available_models(), agent.default_model());
        Self {
            agent,
            media,
            index_html: Arc::from(index_html),
        }
    }
}

/// Everything a handler can fail with, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Chat(ChatError),
    Multipart(MultipartError),
    Json(JsonRejection),
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        ApiError::Chat(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Json(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart(e)
    }
}

pub fn status_for(err: &ChatError) -> StatusCode {
    match err {
        ChatError::InvalidModel(_) | ChatError::InvalidMessage(_) | ChatError::InvalidUpload(_) =>
            StatusCode::BAD_REQUEST,
        ChatError::ConversationNotFound(_) => StatusCode::NOT_FOUND,
        ChatError::ResponseGeneration(_) | ChatError::Storage(_) =>
            StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, detail) = match self {
            ApiError::Chat(e) => {
                if e.is_client_error() {
                    warn!("Request rejected: {}", e);
                } else {
                    error!("Request failed: {}", e);
                }
                (status_for(&e), e.to_string())
            }
            ApiError::Multipart(e) => {
                warn!("Malformed multipart upload: {}", e);
                (e.status(), e.body_text())
            }
            ApiError::Json(e) => {
                warn!("Malformed JSON request: {}", e);
                (e.status(), e.body_text())
            }
        };
        (code, Json(ErrorResponse { detail })).into_response()
    }
}

pub fn build_router(state: AppState, max_upload_bytes: Option<usize>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/models", get(models_handler))
        .route("/start_conversation", post(start_conversation_handler))
        .route("/send_message", post(send_message_handler))
        .route("/upload_media", post(upload_media_handler).layer(body_limit))
        .route("/conversations/{conversation_id}", get(conversation_handler))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

async fn models_handler(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.agent.available_models().to_vec(),
        default_model: state.agent.default_model().to_string(),
    })
}

async fn start_conversation_handler(
    State(state): State<AppState>,
    payload: Result<Json<StartConversationRequest>, JsonRejection>
) -> Result<Json<StartConversationResponse>, ApiError> {
    let Json(req) = payload?;
    let conversation_id = state.agent.start_conversation(req.theme, req.model).await?;
    Ok(Json(StartConversationResponse { conversation_id }))
}

async fn send_message_handler(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Json(req) = payload?;
    let conversation_id = req.conversation_id.unwrap_or_default();
    let message = match req.message {
        Some(message) => message,
        None => {
            // unknown conversations still answer 404
            state.agent.conversation(&conversation_id).await?;
            return Err(ChatError::InvalidMessage("missing message field".into()).into());
        }
    };
    let response = state.agent.send_message(&conversation_id, &message).await?;
    Ok(Json(SendMessageResponse { response }))
}

async fn conversation_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>
) -> Result<Json<Conversation>, ApiError> {
    Ok(Json(state.agent.conversation(&conversation_id).await?))
}

async fn upload_media_handler(
    State(state): State<AppState>,
    mut multipart: Multipart
) -> Result<Json<UploadMediaResponse>, ApiError> {
    let mut conversation_id: Option<String> = None;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("conversation_id") => {
                conversation_id = Some(field.text().await?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                upload = Some((filename, bytes));
            }
            other => {
                info!("Ignoring unexpected upload field {:?}", other);
            }
        }
    }

    let conversation_id = conversation_id.ok_or_else(||
        ChatError::InvalidUpload("missing conversation_id field".into())
    )?;
    let (filename, bytes) = upload.ok_or_else(||
        ChatError::InvalidUpload("missing file field".into())
    )?;

    state.media.ingest(&conversation_id, &filename, &bytes).await?;
    Ok(Json(UploadMediaResponse { status: UPLOAD_SUCCESS_STATUS.to_string() }))
}
