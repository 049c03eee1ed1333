use serde::Deserialize;

use crate::search::models::{BadgeHint, EntityKind, SearchableEntity};

/// Sanity slugs arrive as `{ "current": "..." }`, some projections flatten them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SlugField {
    Plain(String),
    Object { current: Option<String> },
}

impl SlugField {
    pub fn current(&self) -> Option<&str> {
        match self {
            SlugField::Plain(s) => Some(s),
            SlugField::Object { current } => current.as_deref(),
        }
    }
}

/// One record as projected by the snapshot query.
///
/// A superset of the fields any kind carries; which ones are consulted is
/// decided per kind in [`normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub slug: Option<SlugField>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_image: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub fulfilled: Option<bool>,
    #[serde(default)]
    pub search_text: Option<String>,
}

/// Result of the batched snapshot query, one array per kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSnapshot {
    pub politicians: Vec<SourceRecord>,
    pub events: Vec<SourceRecord>,
    pub news: Vec<SourceRecord>,
    pub political_areas: Vec<SourceRecord>,
    pub geographical_areas: Vec<SourceRecord>,
    pub political_issues: Vec<SourceRecord>,
}

impl SearchSnapshot {
    /// All records tagged with their kind, in snapshot order.
    pub fn into_records(self) -> impl Iterator<Item = (EntityKind, SourceRecord)> {
        let tag = |kind: EntityKind, records: Vec<SourceRecord>| {
            records.into_iter().map(move |record| (kind, record))
        };
        tag(EntityKind::Politician, self.politicians)
            .chain(tag(EntityKind::Event, self.events))
            .chain(tag(EntityKind::News, self.news))
            .chain(tag(EntityKind::PoliticalArea, self.political_areas))
            .chain(tag(EntityKind::GeographicalArea, self.geographical_areas))
            .chain(tag(EntityKind::PoliticalIssue, self.political_issues))
    }
}

/// First candidate that is present and not blank.
fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// `mainImage` wins over `image`.
fn preferred_image(record: &SourceRecord) -> Option<serde_json::Value> {
    record
        .main_image
        .iter()
        .chain(record.image.iter())
        .find(|img| !img.is_null())
        .cloned()
}

/// Project one source record into the uniform search shape.
pub fn normalize(kind: EntityKind, record: SourceRecord) -> SearchableEntity {
    let name = record.name.as_deref();
    let title = record.title.as_deref();
    let question = record.question.as_deref();
    let excerpt_field = record.excerpt.as_deref();
    let description = record.description.as_deref();

    let (display_name, excerpt, badge_hint) = match kind {
        EntityKind::Politician => (first_non_empty(&[name, title]), None, None),
        EntityKind::Event => (first_non_empty(&[title, name]), first_non_empty(&[description]), None),
        EntityKind::News => (
            first_non_empty(&[title, name]),
            first_non_empty(&[excerpt_field, description]),
            None,
        ),
        EntityKind::PoliticalArea | EntityKind::GeographicalArea => {
            (first_non_empty(&[name, title]), first_non_empty(&[description]), None)
        }
        EntityKind::PoliticalIssue => (
            first_non_empty(&[question, title, name]),
            first_non_empty(&[description]),
            Some(BadgeHint::resolve(
                record.fulfilled.unwrap_or(false),
                record.featured.unwrap_or(false),
            )),
        ),
    };

    let display_name = display_name.unwrap_or_default().to_string();
    let excerpt = excerpt.map(str::to_string);
    let slug = record
        .slug
        .as_ref()
        .and_then(SlugField::current)
        .unwrap_or_default()
        .trim()
        .to_string();

    let search_text = match first_non_empty(&[record.search_text.as_deref()]) {
        Some(text) => text.to_string(),
        None => [Some(display_name.as_str()), excerpt.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
    };

    SearchableEntity {
        image: preferred_image(&record),
        id: record.id,
        kind,
        url: kind.url_for(&slug),
        category: kind.category().to_string(),
        display_name,
        slug,
        excerpt,
        badge_hint,
        search_text,
    }
}

/// Normalize a whole snapshot, preserving snapshot order.
pub fn build_search_items(snapshot: SearchSnapshot) -> Vec<SearchableEntity> {
    snapshot
        .into_records()
        .map(|(kind, record)| normalize(kind, record))
        .collect()
}
