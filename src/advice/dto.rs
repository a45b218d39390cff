use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct AdviseRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdviseResponse {
    pub reply: String,
    pub suggestions: Vec<&'static str>,
}
