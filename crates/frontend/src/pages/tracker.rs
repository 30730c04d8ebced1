use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use workout_map_shared::config::AppConfig;
use workout_map_shared::form::WorkoutForm;
use workout_map_shared::models::{Coords, WorkoutKind};
use workout_map_shared::render;
use workout_map_shared::session::Session;
use workout_map_shared::storage::WorkoutStore;

use crate::browser::{self, BrowserStore};
use crate::components::entry_form::EntryForm;
use crate::components::map_view::{MapState, MapView};
use crate::components::workout_list::WorkoutList;

const POSITION_ALERT: &str = "Could not get your position";
const INPUT_ALERT: &str = "Inputs have to be positive numbers!";

#[component]
pub fn Tracker() -> Element {
    let config = use_context::<AppConfig>();
    let zoom = config.map.zoom;
    let pan_ms = config.map.pan_duration_ms();

    let storage_key = config.storage_key.clone();
    let mut session = use_signal(move || {
        let session = Session::open(WorkoutStore::new(BrowserStore::open(), storage_key));
        tracing::info!(workouts = session.workouts().len(), "Session opened");
        session
    });

    // UI state
    let mut map_view = use_signal(|| None::<MapState>);
    let mut form = use_signal(WorkoutForm::default);
    let mut form_visible = use_signal(|| false);
    let mut show_clear = use_signal(|| false);
    let distance_input = use_signal(|| None::<Rc<MountedData>>);

    // Centre the map on the user once the browser answers
    let _locate = use_resource(move || async move {
        match browser::current_position().await {
            Ok(coords) => {
                tracing::info!(lat = coords.lat, lng = coords.lng, "Position acquired");
                map_view.set(Some(MapState::new(coords, zoom)));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Geolocation failed");
                browser::alert(POSITION_ALERT);
            }
        }
    });

    let on_map_click = move |coords: Coords| {
        session.write().select_location(coords);
        form_visible.set(true);
        show_clear.set(true);
        let mounted = distance_input.read().clone();
        if let Some(input) = mounted {
            spawn(async move {
                if let Err(e) = input.set_focus(true).await {
                    tracing::debug!(error = ?e, "Could not focus distance field");
                }
            });
        }
    };

    let on_submit = move |_: ()| {
        let current = form.read().clone();
        let result = session
            .write()
            .submit(&current, chrono::Local::now())
            .map(|w| w.id().to_string());
        match result {
            Ok(id) => {
                tracing::debug!(id = %id, "Form accepted");
                form.write().clear();
                form_visible.set(false);
            }
            Err(e) => {
                tracing::debug!(error = %e, user_input = e.is_user_input(), "Form rejected");
                browser::alert(INPUT_ALERT);
            }
        }
    };

    let on_select = move |id: String| {
        let target = session.read().locate(&id);
        let Some(coords) = target else {
            tracing::debug!(id = %id, "Clicked workout not found");
            return;
        };
        let current = *map_view.read();
        let Some(mut state) = current else {
            return;
        };
        let pan = state.set_view(coords, zoom, true);
        map_view.set(Some(state));
        if !state.animate {
            return;
        }
        spawn(async move {
            TimeoutFuture::new(pan_ms).await;
            let settled = *map_view.read();
            if let Some(mut state) = settled {
                if state.settle(pan) {
                    map_view.set(Some(state));
                }
            }
        });
    };

    let on_clear = move |_: MouseEvent| {
        match session.write().clear() {
            Ok(()) => tracing::info!("All workouts cleared"),
            Err(e) => tracing::warn!(error = %e, "Could not clear stored workouts"),
        }
        form.set(WorkoutForm::default());
        form_visible.set(false);
        show_clear.set(false);
    };

    let workouts = session.read().workouts().to_vec();
    let cards = render::display_order(&workouts);

    rsx! {
        div { class: "tracker",
            div { class: "sidebar",
                ul { class: "workouts",
                    EntryForm {
                        form: form,
                        visible: *form_visible.read(),
                        distance_input: distance_input,
                        on_toggle_type: move |kind: WorkoutKind| form.write().kind = kind,
                        on_submit: on_submit,
                    }
                    WorkoutList { cards: cards, on_select: on_select }
                }
                if *show_clear.read() {
                    button { class: "btn-clear", onclick: on_clear, "Clear all" }
                }
            }
            MapView {
                view: map_view,
                workouts: workouts,
                on_map_click: on_map_click,
            }
        }
    }
}
