//! GROQ queries issued against the content store.

/// One batched read of every searchable collection.
///
/// Each array carries a denormalized `searchText` blob so ranking can match
/// on fields that are not otherwise projected into the result.
pub const SEARCH_SNAPSHOT_QUERY: &str = r#"{
  "politicians": *[_type == "politician"] {
    _id,
    name,
    slug,
    image,
    "searchText": coalesce(name, "") + " " + coalesce(email, "")
  },
  "events": *[_type == "event"] {
    _id,
    title,
    slug,
    description,
    mainImage,
    image,
    "searchText": coalesce(title, "") + " " + coalesce(location, "") + " " + coalesce(description, "")
  },
  "news": *[_type == "news"] {
    _id,
    title,
    slug,
    excerpt,
    mainImage,
    image,
    "searchText": coalesce(title, "") + " " + coalesce(excerpt, "")
  },
  "politicalAreas": *[_type == "politicalArea"] {
    _id,
    name,
    slug,
    description,
    image,
    "searchText": coalesce(name, "") + " " + coalesce(description, "")
  },
  "geographicalAreas": *[_type == "geographicalArea"] {
    _id,
    name,
    slug,
    description,
    image,
    "searchText": coalesce(name, "") + " " + coalesce(description, "")
  },
  "politicalIssues": *[_type == "politicalIssue"] {
    _id,
    question,
    slug,
    description,
    featured,
    fulfilled,
    "searchText": coalesce(question, "") + " " + coalesce(description, "")
  }
}"#;

/// Area lists injected into the static navigation table.
pub const NAVIGATION_AREAS_QUERY: &str = r#"{
  "politicalAreas": *[_type == "politicalArea"] | order(name asc) {
    name,
    "slug": slug.current,
    icon
  },
  "geographicalAreas": *[_type == "geographicalArea"] | order(name asc) {
    name,
    "slug": slug.current
  }
}"#;
