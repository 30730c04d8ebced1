use std::rc::Rc;

use dioxus::prelude::*;
use workout_map_shared::form::WorkoutForm;
use workout_map_shared::models::WorkoutKind;

#[component]
pub fn EntryForm(
    form: Signal<WorkoutForm>,
    visible: bool,
    distance_input: Signal<Option<Rc<MountedData>>>,
    on_toggle_type: EventHandler<WorkoutKind>,
    on_submit: EventHandler<()>,
) -> Element {
    let current = form.read().clone();
    let (cadence_row, elevation_row) = if current.shows_cadence() {
        ("form__row", "form__row form__row--hidden")
    } else {
        ("form__row form__row--hidden", "form__row")
    };

    rsx! {
        form {
            class: if visible { "form" } else { "form hidden" },
            onsubmit: move |evt: Event<FormData>| {
                evt.prevent_default();
                on_submit.call(());
            },

            div { class: "form__row",
                label { class: "form__label", "Type" }
                select {
                    class: "form__input form__input--type",
                    value: "{current.kind}",
                    onchange: move |evt: Event<FormData>| {
                        if let Ok(kind) = evt.value().parse::<WorkoutKind>() {
                            on_toggle_type.call(kind);
                        }
                    },
                    for kind in WorkoutKind::ALL {
                        option {
                            value: "{kind}",
                            selected: current.kind == kind,
                            "{kind.label()}"
                        }
                    }
                }
            }
            div { class: "form__row",
                label { class: "form__label", "Distance" }
                input {
                    class: "form__input form__input--distance",
                    placeholder: "km",
                    value: "{current.distance}",
                    onmounted: move |evt: MountedEvent| distance_input.set(Some(evt.data())),
                    oninput: move |evt: Event<FormData>| form.write().distance = evt.value(),
                }
            }
            div { class: "form__row",
                label { class: "form__label", "Duration" }
                input {
                    class: "form__input form__input--duration",
                    placeholder: "min",
                    value: "{current.duration}",
                    oninput: move |evt: Event<FormData>| form.write().duration = evt.value(),
                }
            }
            div { class: "{cadence_row}",
                label { class: "form__label", "Cadence" }
                input {
                    class: "form__input form__input--cadence",
                    placeholder: "step/min",
                    value: "{current.cadence}",
                    oninput: move |evt: Event<FormData>| form.write().cadence = evt.value(),
                }
            }
            div { class: "{elevation_row}",
                label { class: "form__label", "Elev Gain" }
                input {
                    class: "form__input form__input--elevation",
                    placeholder: "meters",
                    value: "{current.elevation}",
                    oninput: move |evt: Event<FormData>| form.write().elevation = evt.value(),
                }
            }
            button { class: "form__btn", r#type: "submit", "OK" }
        }
    }
}
