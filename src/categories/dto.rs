use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Partial update; empty fields keep their stored value. The slug never
/// changes after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}

fn default_color() -> String {
    "#6b7280".into()
}
