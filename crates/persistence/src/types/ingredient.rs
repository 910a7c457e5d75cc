//! Ingredient documents.
//!
//! Free-form ingredient metadata lives in a document store keyed by the
//! ingredient name. Each non-empty field of the document becomes a titled
//! section on the detail page.

use serde::{Deserialize, Serialize};

/// Document field holding the ingredient name.
pub const NAME_FIELD: &str = "Nom";

/// Sections rendered as tables rather than paragraphs.
pub const TABULAR_SECTIONS: [&str; 2] = ["Précautions", "Risques liés au traitement"];

/// How a section is laid out on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    /// One table row per entry.
    Table,
    /// One paragraph per entry.
    Paragraphs,
}

/// A titled block of ingredient metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// Field name, used as the heading.
    pub title: String,
    /// Entries, in document order.
    pub entries: Vec<String>,
    /// Layout.
    pub layout: SectionLayout,
}

/// Metadata for one active ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDocument {
    /// Ingredient name (the `Nom` field).
    pub name: String,
    /// Non-empty sections, in document order.
    pub sections: Vec<DocumentSection>,
}

impl IngredientDocument {
    /// Builds a document from its raw fields.
    ///
    /// The name field and `_id` are not sections; fields with no non-blank
    /// entry are dropped.
    pub fn from_fields<I>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let sections = fields
            .into_iter()
            .filter(|(title, _)| title != NAME_FIELD && title != "_id")
            .filter_map(|(title, entries)| {
                let entries: Vec<String> = entries
                    .into_iter()
                    .filter(|e| !e.trim().is_empty())
                    .collect();
                if entries.is_empty() {
                    return None;
                }
                let layout = if TABULAR_SECTIONS.contains(&title.as_str()) {
                    SectionLayout::Table
                } else {
                    SectionLayout::Paragraphs
                };
                Some(DocumentSection {
                    title,
                    entries,
                    layout,
                })
            })
            .collect();

        Self {
            name: name.into(),
            sections,
        }
    }
}
