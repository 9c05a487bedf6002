//! Title entity model and DTOs.
//!
//! Titles carry no stored rating. [`TitleRow`] holds the average review
//! score computed by the query that loaded it, and [`TitleDetail`] turns it
//! into the display rating.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use yamdb_core::rating;
use yamdb_core::types::{DbId, Timestamp};

use crate::models::category::Category;
use crate::models::genre::Genre;

/// A `titles` row joined with its category and the live average score.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// `AVG(score)` over the title's reviews; `NULL` when there are none.
    pub avg_score: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Read representation of a title with embedded category, genres and rating.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    /// Always present in the payload; `null` when the title has no reviews.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<Genre>,
    pub category: Option<Category>,
}

impl TitleDetail {
    pub fn from_row(row: TitleRow, genre: Vec<Genre>) -> Self {
        let category = match (row.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: rating::round_rating(row.avg_score),
            description: row.description,
            genre,
            category,
        }
    }
}

/// DTO for creating a title. Category and genres are referenced by slug.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: String,
}

/// DTO for updating a title. When `genre` is present it replaces the full
/// genre list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Title list filters (`?category=&genre=&name=&year=`). All are exact matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleFilter {
    /// Category slug.
    pub category: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    pub name: Option<String>,
    pub year: Option<i32>,
}
