use serde::{ Serialize, Deserialize };

#[derive(Deserialize, Debug, Default)]
pub struct StartConversationRequest {
    pub theme: Option<String>,
    pub model: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct StartConversationResponse {
    pub conversation_id: String,
}

#[derive(Deserialize, Debug)]
pub struct SendMessageRequest {
    pub conversation_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SendMessageResponse {
    pub response: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadMediaResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default_model: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub detail: String,
}
