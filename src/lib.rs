pub mod app;
pub mod config;
pub mod error;
pub mod api {
    pub mod contact;
    pub mod errors;
    pub mod navigation;
    pub mod revalidate;
    pub mod search;
}
pub mod cache {
    pub mod tags;
}
pub mod contact {
    pub mod form;
    pub mod mailer;
}
pub mod content {
    pub mod client;
    pub mod queries;
}
pub mod navigation {
    pub mod menu;
}
pub mod revalidate {
    pub mod signature;
    pub mod tags;
}
pub mod search {
    pub mod fuzzy;
    pub mod models;
    pub mod normalize;
    pub mod service;
}
