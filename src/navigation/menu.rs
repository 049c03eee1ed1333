use serde::{Deserialize, Serialize};

const POLITICS_ROUTE: &str = "/politik";
const CATEGORY_ROUTE: &str = "/politik/kategori";
const AREA_ROUTE: &str = "/omrade";

const POLITICS_TITLE: &str = "Politik";
const CATEGORY_TITLE: &str = "Kategori";
const AREAS_TITLE: &str = "Områden";

/// Slug left behind by an unfilled template field.
const PLACEHOLDER_SLUG: &str = "$1";

/// One entry of the static header table.
#[derive(Debug)]
pub struct StaticNavItem {
    pub title: &'static str,
    pub route: &'static str,
    pub children: &'static [StaticNavItem],
}

/// Header items shown before any CMS-configured entries.
pub static STATIC_NAV: &[StaticNavItem] = &[
    StaticNavItem {
        title: POLITICS_TITLE,
        route: POLITICS_ROUTE,
        children: &[
            StaticNavItem { title: "Översikt", route: "/politik", children: &[] },
            StaticNavItem { title: "Sakfrågor", route: "/politik/sakfragor", children: &[] },
            StaticNavItem { title: CATEGORY_TITLE, route: CATEGORY_ROUTE, children: &[] },
        ],
    },
    StaticNavItem { title: "Politiker", route: "/politiker", children: &[] },
    StaticNavItem { title: "Nyheter", route: "/nyheter", children: &[] },
    StaticNavItem { title: "Event", route: "/evenemang", children: &[] },
    StaticNavItem { title: "Kontakt", route: "/kontakt", children: &[] },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Static,
}

/// A rendered menu entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub title: String,
    pub link_type: LinkType,
    pub static_route: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    fn link(title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link_type: LinkType::Static,
            static_route: route.into(),
            icon: None,
            children: Vec::new(),
        }
    }
}

impl From<&StaticNavItem> for MenuItem {
    fn from(item: &StaticNavItem) -> Self {
        Self {
            children: item.children.iter().map(MenuItem::from).collect(),
            ..MenuItem::link(item.title, item.route)
        }
    }
}

/// A political or geographical area as listed by the navigation query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NavigationArea {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub icon: Option<serde_json::Value>,
}

impl NavigationArea {
    fn usable_slug(&self) -> Option<&str> {
        self.slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty() && *slug != PLACEHOLDER_SLUG)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationAreas {
    pub political_areas: Vec<NavigationArea>,
    pub geographical_areas: Vec<NavigationArea>,
}

fn area_links(areas: &[NavigationArea], base: &str, with_icon: bool) -> Vec<MenuItem> {
    areas
        .iter()
        .filter_map(|area| {
            let slug = area.usable_slug()?;
            let mut item = MenuItem::link(
                area.name.clone().unwrap_or_default(),
                format!("{base}/{slug}"),
            );
            if with_icon {
                item.icon = area.icon.clone().filter(|icon| !icon.is_null());
            }
            Some(item)
        })
        .collect()
}

/// Build the header menu from the static table and the CMS areas.
///
/// Geographical areas become an "Områden" dropdown placed right after
/// "Politik"; political areas become the children of "Politik" > "Kategori".
pub fn build_navigation(
    static_items: &[StaticNavItem],
    geographical_areas: &[NavigationArea],
    political_areas: &[NavigationArea],
) -> Vec<MenuItem> {
    let mut items: Vec<MenuItem> = static_items.iter().map(MenuItem::from).collect();

    let areas_dropdown = MenuItem {
        children: area_links(geographical_areas, AREA_ROUTE, false),
        ..MenuItem::link(AREAS_TITLE, AREA_ROUTE)
    };

    let politics_index = items.iter().position(|item| item.title == POLITICS_TITLE);

    if let Some(i) = politics_index {
        if let Some(category) = items[i]
            .children
            .iter_mut()
            .find(|child| child.title == CATEGORY_TITLE)
        {
            category.children = area_links(political_areas, CATEGORY_ROUTE, true);
        }
    }

    let insert_at = politics_index.map_or(1, |i| i + 1).min(items.len());
    items.insert(insert_at, areas_dropdown);
    items
}
