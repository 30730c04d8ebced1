use dioxus::prelude::*;
use workout_map_shared::render::WorkoutCard;

/// List entries, newest first. Clicking an entry reports its workout id.
#[component]
pub fn WorkoutList(cards: Vec<WorkoutCard>, on_select: EventHandler<String>) -> Element {
    rsx! {
        for card in cards {
            li {
                key: "{card.id}",
                class: "{card.class()}",
                "data-id": "{card.id}",
                onclick: {
                    let id = card.id.clone();
                    move |_| on_select.call(id.clone())
                },
                h2 { class: "workout__title", "{card.title}" }
                for detail in card.details.iter() {
                    div { class: "workout__details",
                        span { class: "workout__icon", "{detail.icon}" }
                        span { class: "workout__value", "{detail.value}" }
                        span { class: "workout__unit", "{detail.unit}" }
                    }
                }
            }
        }
    }
}
