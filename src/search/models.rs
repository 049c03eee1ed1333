use serde::{Deserialize, Serialize};

use crate::revalidate::tags::CacheTag;

/// The searchable content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Politician,
    Event,
    News,
    PoliticalArea,
    GeographicalArea,
    PoliticalIssue,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Politician,
        EntityKind::Event,
        EntityKind::News,
        EntityKind::PoliticalArea,
        EntityKind::GeographicalArea,
        EntityKind::PoliticalIssue,
    ];

    /// Public route under which entities of this kind are served.
    pub fn route_prefix(self) -> &'static str {
        match self {
            EntityKind::Politician => "/politiker",
            EntityKind::Event => "/event",
            EntityKind::News => "/nyheter",
            EntityKind::PoliticalArea => "/politik",
            EntityKind::GeographicalArea => "/omrade",
            EntityKind::PoliticalIssue => "/politik/sakfragor",
        }
    }

    /// Display label shown next to a search hit.
    pub fn category(self) -> &'static str {
        match self {
            EntityKind::Politician => "Politiker",
            EntityKind::Event => "Evenemang",
            EntityKind::News => "Nyheter",
            EntityKind::PoliticalArea => "Politiskt område",
            EntityKind::GeographicalArea => "Geografiskt område",
            EntityKind::PoliticalIssue => "Sakfråga",
        }
    }

    /// Cache tag that a change to this kind invalidates.
    pub fn cache_tag(self) -> CacheTag {
        match self {
            EntityKind::Politician => CacheTag::Politicians,
            EntityKind::Event => CacheTag::Events,
            EntityKind::News => CacheTag::News,
            EntityKind::PoliticalArea
            | EntityKind::GeographicalArea
            | EntityKind::PoliticalIssue => CacheTag::Politics,
        }
    }

    pub fn url_for(self, slug: &str) -> String {
        format!("{}/{}", self.route_prefix(), slug)
    }
}

/// Badge shown on political issue hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeHint {
    Fulfilled,
    Featured,
    Default,
}

impl BadgeHint {
    /// `fulfilled` wins over `featured`; neither yields `Default`.
    pub fn resolve(fulfilled: bool, featured: bool) -> Self {
        if fulfilled {
            BadgeHint::Fulfilled
        } else if featured {
            BadgeHint::Featured
        } else {
            BadgeHint::Default
        }
    }
}

/// A content record projected into the uniform search shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableEntity {
    pub id: String,
    pub kind: EntityKind,
    pub display_name: String,
    pub slug: String,
    pub url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Raw image object from the content store; URL building happens client side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge_hint: Option<BadgeHint>,
    /// Denormalized full-text blob used for ranking.
    pub search_text: String,
}

/// A ranked search hit. Lower scores are better.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    #[serde(flatten)]
    pub entity: SearchableEntity,
    pub relevance_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_precedence() {
        assert_eq!(BadgeHint::resolve(true, true), BadgeHint::Fulfilled);
        assert_eq!(BadgeHint::resolve(true, false), BadgeHint::Fulfilled);
        assert_eq!(BadgeHint::resolve(false, true), BadgeHint::Featured);
        assert_eq!(BadgeHint::resolve(false, false), BadgeHint::Default);
    }

    #[test]
    fn test_cache_tag_matches_webhook_mapping() {
        for kind in EntityKind::ALL {
            let document_type = serde_json::to_value(kind).unwrap();
            let tags = crate::revalidate::tags::tags_for(document_type.as_str().unwrap(), None);
            assert_eq!(tags, vec![kind.cache_tag()], "{kind:?}");
        }
    }

    #[test]
    fn test_kind_routes() {
        assert_eq!(EntityKind::Politician.url_for("anna-a"), "/politiker/anna-a");
        assert_eq!(EntityKind::PoliticalIssue.url_for("skatt"), "/politik/sakfragor/skatt");
        assert_eq!(EntityKind::GeographicalArea.url_for(""), "/omrade/");
    }

    #[test]
    fn test_ranked_result_serializes_flat_camel_case() {
        let result = RankedResult {
            entity: SearchableEntity {
                id: "p1".into(),
                kind: EntityKind::PoliticalIssue,
                display_name: "Sänkt skatt?".into(),
                slug: "sankt-skatt".into(),
                url: "/politik/sakfragor/sankt-skatt".into(),
                category: "Sakfråga".into(),
                excerpt: None,
                image: None,
                badge_hint: Some(BadgeHint::Featured),
                search_text: "Sänkt skatt?".into(),
            },
            relevance_score: 0.25,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "politicalIssue");
        assert_eq!(json["displayName"], "Sänkt skatt?");
        assert_eq!(json["badgeHint"], "featured");
        assert_eq!(json["relevanceScore"], 0.25);
        assert!(json.get("excerpt").is_none());
        assert!(json.get("entity").is_none());
    }
}
