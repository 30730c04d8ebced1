use std::collections::HashSet;

use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use workout_map_shared::config::AppConfig;
use workout_map_shared::geo::{self, Tile, WorldPoint};
use workout_map_shared::models::{Coords, Workout};
use workout_map_shared::render;

const MAP_CONTAINER_ID: &str = "workout-map-container";

/// Mouse movement below this many pixels is a click, not a drag.
const DRAG_THRESHOLD: f64 = 3.0;

/// Touch movement below this many pixels is a tap.
const TOUCH_DRAG_THRESHOLD: f64 = 8.0;

/// Container size assumed until the element is mounted and measured.
const FALLBACK_SIZE: (f64, f64) = (960.0, 640.0);

/// Animated moves longer than this many world pixels jump instead.
const MAX_ANIMATED_PAN: f64 = 4096.0;

/// The map's viewport: what it is centred on, how far it is zoomed, and
/// whether the current move animates.
///
/// Tiles and markers are laid out relative to `origin`, not to the world's
/// top-left corner, so CSS offsets stay near the container size at any zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapState {
    pub center: Coords,
    pub zoom: u8,
    pub animate: bool,
    pub origin: Coords,
    /// Bumped by every `set_view`; identifies the move a timer belongs to.
    pub pan: u64,
}

impl MapState {
    pub fn new(center: Coords, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            animate: false,
            origin: center,
            pan: 0,
        }
    }

    /// Move without animation and rebase the origin on the new centre.
    pub fn jump_to(&mut self, center: Coords, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.animate = false;
        self.origin = center;
    }

    /// Move to `center`, animating when asked and the move stays short.
    /// Returns the id to hand to `settle` once the transition is over.
    pub fn set_view(&mut self, center: Coords, zoom: u8, animate: bool) -> u64 {
        self.pan = self.pan.wrapping_add(1);
        let from = geo::project(self.origin, zoom);
        let to = geo::project(center, zoom);
        let short = (to.x - from.x).hypot(to.y - from.y) <= MAX_ANIMATED_PAN;
        if animate && short && zoom == self.zoom {
            self.center = center;
            self.animate = true;
        } else {
            self.jump_to(center, zoom);
        }
        self.pan
    }

    /// End animated move `pan`. A newer move supersedes it and nothing
    /// changes; returns whether the state was updated.
    pub fn settle(&mut self, pan: u64) -> bool {
        if self.pan != pan || !self.animate {
            return false;
        }
        self.animate = false;
        self.origin = self.center;
        true
    }
}

// ---------------------------------------------------------------------------
// DOM helpers
// ---------------------------------------------------------------------------

fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

fn refresh_size(size: &mut Signal<(f64, f64)>) {
    if let Some(rect) = container_rect() {
        if rect.width() > 0.0 && rect.height() > 0.0 {
            size.set((rect.width(), rect.height()));
        }
    }
}

// ---------------------------------------------------------------------------
// Pan / zoom math
// ---------------------------------------------------------------------------

fn exceeds_drag_threshold(dx: f64, dy: f64, threshold: f64) -> bool {
    dx.abs() > threshold || dy.abs() > threshold
}

/// Centre after dragging the map content by `(dx, dy)` screen pixels.
fn pan_by(center: Coords, zoom: u8, dx: f64, dy: f64) -> Coords {
    let c = geo::project(center, zoom);
    geo::unproject(
        WorldPoint {
            x: c.x - dx,
            y: c.y - dy,
        },
        zoom,
    )
}

/// Centre after a zoom change that keeps the point under the cursor fixed.
fn zoom_at_cursor(
    center: Coords,
    old_zoom: u8,
    new_zoom: u8,
    cursor_x: f64,
    cursor_y: f64,
    width: f64,
    height: f64,
) -> Coords {
    let anchor = geo::container_to_coords(cursor_x, cursor_y, width, height, center, old_zoom);
    let a = geo::project(anchor, new_zoom);
    geo::unproject(
        WorldPoint {
            x: a.x - (cursor_x - width / 2.0),
            y: a.y - (cursor_y - height / 2.0),
        },
        new_zoom,
    )
}

/// One zoom level per wheel notch, within bounds.
fn step_zoom(zoom: u8, delta_y: f64, min_zoom: u8, max_zoom: u8) -> u8 {
    let next = if delta_y < 0.0 {
        zoom.saturating_add(1)
    } else {
        zoom.saturating_sub(1)
    };
    next.clamp(min_zoom, max_zoom)
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn tile_key(tile: Tile, origin: WorldPoint) -> String {
    // Wrapped columns repeat x, so the world origin keeps keys unique.
    format!("{}/{}/{}@{}", tile.z, tile.x, tile.y, origin.x)
}

/// Container position of the pane's top-left corner.
fn pane_offset(state: &MapState, size: (f64, f64)) -> WorldPoint {
    let c = geo::project(state.center, state.zoom);
    let o = geo::project(state.origin, state.zoom);
    WorldPoint {
        x: size.0 / 2.0 - (c.x - o.x),
        y: size.1 / 2.0 - (c.y - o.y),
    }
}

/// Position of a world point inside the pane.
fn pane_position(p: WorldPoint, state: &MapState) -> WorldPoint {
    let o = geo::project(state.origin, state.zoom);
    WorldPoint {
        x: p.x - o.x,
        y: p.y - o.y,
    }
}

/// Coordinates under a pointer at container position `(x, y)`. Takes the
/// same size the view was rendered with.
fn pointer_to_coords(state: &MapState, size: (f64, f64), x: f64, y: f64) -> Coords {
    geo::container_to_coords(x, y, size.0, size.1, state.center, state.zoom)
}

fn position_style(p: WorldPoint) -> String {
    format!("left: {}px; top: {}px;", p.x, p.y)
}

struct TileView {
    key: String,
    url: String,
    style: String,
}

struct MarkerView {
    id: String,
    style: String,
    popup_class: String,
    text: String,
    open: bool,
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView(
    view: Signal<Option<MapState>>,
    workouts: Vec<Workout>,
    on_map_click: EventHandler<Coords>,
) -> Element {
    let config = use_context::<AppConfig>();
    let min_zoom = config.map.min_zoom;
    let max_zoom = config.map.max_zoom;

    let mut size = use_signal(|| FALLBACK_SIZE);
    let mut closed_popups = use_signal(HashSet::<String>::new);

    // Drag state (mouse)
    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_start = use_signal(|| (0.0_f64, 0.0_f64));
    let mut drag_start_center = use_signal(|| None::<Coords>);

    // Touch state
    let mut touch_start = use_signal(|| None::<(f64, f64)>);
    let mut touch_did_pan = use_signal(|| false);

    let Some(state) = *view.read() else {
        return rsx! {
            div { id: MAP_CONTAINER_ID, class: "map-container loading",
                p { "Waiting for your location…" }
            }
        };
    };

    let (width, height) = *size.read();
    let offset = pane_offset(&state, (width, height));
    let transition = if state.animate {
        format!(
            " transition: transform {}ms ease-in-out;",
            config.map.pan_duration_ms()
        )
    } else {
        String::new()
    };
    let pane_style = format!(
        "transform: translate({}px, {}px);{transition}",
        offset.x, offset.y
    );

    let tiles: Vec<TileView> = geo::visible_tiles(state.center, state.zoom, width, height)
        .into_iter()
        .map(|(tile, origin)| TileView {
            key: tile_key(tile, origin),
            url: geo::tile_url(&config.map.tile_url, tile),
            style: position_style(pane_position(origin, &state)),
        })
        .collect();

    let closed = closed_popups.read();
    let markers: Vec<MarkerView> = workouts
        .iter()
        .map(|w| MarkerView {
            id: w.id().to_string(),
            style: position_style(pane_position(geo::project(w.coords(), state.zoom), &state)),
            popup_class: render::popup_class(w.kind()),
            text: render::popup_content(w),
            open: !closed.contains(w.id()),
        })
        .collect();
    drop(closed);

    let popup_style = format!(
        "max-width: {}px; max-height: {}px;",
        config.map.popup_max_width, config.map.popup_max_height
    );
    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| refresh_size(&mut size),
            onresize: move |_| refresh_size(&mut size),

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let Some(mut state) = *view.read() else { return };
                let new_zoom = step_zoom(state.zoom, wheel_delta_y(evt.data().delta()), min_zoom, max_zoom);
                if new_zoom == state.zoom {
                    return;
                }
                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let (width, height) = *size.read();
                let center = zoom_at_cursor(
                    state.center, state.zoom, new_zoom,
                    client.x - rect.left(), client.y - rect.top(),
                    width, height,
                );
                state.jump_to(center, new_zoom);
                view.set(Some(state));
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                let current = *view.read();
                let center = current.map(|s| s.center);
                is_dragging.set(true);
                did_drag.set(false);
                drag_start.set((client.x, client.y));
                drag_start_center.set(center);
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (sx, sy) = *drag_start.read();
                let (dx, dy) = (client.x - sx, client.y - sy);
                if !*did_drag.read() && exceeds_drag_threshold(dx, dy, DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    let start = *drag_start_center.read();
                    let current = *view.read();
                    if let (Some(start), Some(mut state)) = (start, current) {
                        let center = pan_by(start, state.zoom, dx, dy);
                        state.jump_to(center, state.zoom);
                        view.set(Some(state));
                    }
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click
                if !was_dragging || was_drag {
                    return;
                }
                let Some(state) = *view.read() else { return };
                let Some(rect) = container_rect() else { return };
                let client = evt.client_coordinates();
                let coords = pointer_to_coords(
                    &state, *size.read(),
                    client.x - rect.left(), client.y - rect.top(),
                );
                on_map_click.call(coords);
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            // --- Touch: one finger pans, a tap without movement clicks ---

            ontouchstart: move |evt: Event<TouchData>| {
                let touches = evt.data().touches();
                if touches.len() != 1 {
                    touch_start.set(None);
                    return;
                }
                let p = touches[0].client_coordinates();
                let current = *view.read();
                let center = current.map(|s| s.center);
                touch_start.set(Some((p.x, p.y)));
                touch_did_pan.set(false);
                drag_start_center.set(center);
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                let Some((sx, sy)) = *touch_start.read() else { return };
                if touches.len() != 1 {
                    return;
                }
                let p = touches[0].client_coordinates();
                let (dx, dy) = (p.x - sx, p.y - sy);
                if !*touch_did_pan.read() && exceeds_drag_threshold(dx, dy, TOUCH_DRAG_THRESHOLD) {
                    touch_did_pan.set(true);
                }
                if *touch_did_pan.read() {
                    let start = *drag_start_center.read();
                    let current = *view.read();
                    if let (Some(start), Some(mut state)) = (start, current) {
                        let center = pan_by(start, state.zoom, dx, dy);
                        state.jump_to(center, state.zoom);
                        view.set(Some(state));
                    }
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                if !evt.data().touches().is_empty() {
                    return;
                }
                let start = *touch_start.read();
                let tapped = !*touch_did_pan.read();
                touch_start.set(None);
                let (Some((x, y)), true) = (start, tapped) else { return };
                let Some(state) = *view.read() else { return };
                let Some(rect) = container_rect() else { return };
                let coords = pointer_to_coords(&state, *size.read(), x - rect.left(), y - rect.top());
                on_map_click.call(coords);
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                touch_start.set(None);
                touch_did_pan.set(false);
            },

            div {
                class: "map-pane",
                style: "{pane_style}",

                for tile in tiles {
                    img {
                        key: "{tile.key}",
                        class: "map-tile",
                        src: "{tile.url}",
                        style: "{tile.style}",
                        alt: "",
                        draggable: "false",
                    }
                }

                for marker in markers {
                    div {
                        key: "{marker.id}",
                        class: "map-marker-anchor",
                        style: "{marker.style}",

                        div {
                            class: "map-marker",
                            onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                            onclick: {
                                let id = marker.id.clone();
                                move |_| {
                                    closed_popups.write().remove(&id);
                                }
                            },
                        }

                        // Popups stay open until closed here; other clicks never close them.
                        if marker.open {
                            div {
                                class: "map-popup {marker.popup_class}",
                                style: "{popup_style}",
                                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                                button {
                                    class: "map-popup__close",
                                    onclick: {
                                        let id = marker.id.clone();
                                        move |_| {
                                            closed_popups.write().insert(id.clone());
                                        }
                                    },
                                    "×"
                                }
                                div { class: "map-popup__content", "{marker.text}" }
                            }
                        }
                    }
                }
            }

            div { class: "map-attribution", "{config.map.attribution}" }
        }
    }
}
