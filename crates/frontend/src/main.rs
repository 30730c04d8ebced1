mod browser;
mod components;
mod pages;

use dioxus::prelude::*;
use workout_map_shared::config::AppConfig;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::tracker::Tracker {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    use_context_provider(AppConfig::from_env);

    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    let config = AppConfig::from_env();
    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    dioxus::logger::init(level).expect("failed to init logger");
    tracing::info!(
        storage_key = %config.storage_key,
        zoom = config.map.zoom,
        "Starting workout map"
    );
    launch(App);
}
