//! Content Models
//! Mission: Rows served by the public site and edited from the admin panel

use serde::{Deserialize, Serialize};

/// News post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: String,
    pub source: String,
    pub published_date: String,
    pub created_at: String,
}

/// Static page section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub content: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

/// Activity (event) entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

/// Post mirrored from the WhatsApp feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsappPost {
    pub id: i64,
    pub content: Option<String>,
    pub image: Option<String>,
    pub external_link: Option<String>,
    pub created_at: String,
}

/// Fields for inserting a news post.
#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub published_date: Option<String>,
}
