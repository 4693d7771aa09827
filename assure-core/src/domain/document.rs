// assure-core/src/domain/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub project_id: String,
    #[serde(alias = "filename", alias = "name")]
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

/// What a table row needs to show for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub code: String,
}

/// Categories keyed by id, built once and shared across rows.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_id: HashMap<String, CategoryRef>,
}

impl CategoryIndex {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let by_id = categories
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    CategoryRef {
                        name: c.name,
                        code: c.code,
                    },
                )
            })
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&CategoryRef> {
        self.by_id.get(id)
    }

    pub fn resolve(&self, document: &Document) -> Option<CategoryRef> {
        document
            .category_id
            .as_deref()
            .and_then(|id| self.get(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}
