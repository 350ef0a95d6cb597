use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryCreate {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl CategoryResponse {
    pub(crate) fn from_db(category: crate::db::models::Category) -> Self {
        Self { id: category.id, name: category.name }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagCreate {
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TagResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl TagResponse {
    pub(crate) fn from_db(tag: crate::db::models::Tag) -> Self {
        Self { id: tag.id, name: tag.name }
    }
}
