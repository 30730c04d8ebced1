//! Thin wrappers over the browser APIs the app needs: localStorage,
//! geolocation and blocking alerts.

use js_sys::Promise;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{GeolocationPosition, GeolocationPositionError};
use workout_map_shared::models::Coords;
use workout_map_shared::storage::{KeyValueStore, MemoryStore};
use workout_map_shared::{Error, Result};

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// `window.localStorage`, or an in-memory map when the browser refuses
/// storage (private mode, disabled cookies).
#[derive(Debug)]
pub enum BrowserStore {
    Local(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match local_storage() {
            Ok(storage) => BrowserStore::Local(storage),
            Err(e) => {
                tracing::warn!(error = %e, "localStorage unavailable, workouts will not persist");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

fn local_storage() -> Result<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| Error::storage("no window"))?;
    window
        .local_storage()
        .map_err(|e| Error::storage(js_message(&e)))?
        .ok_or_else(|| Error::storage("localStorage is disabled"))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            BrowserStore::Local(s) => s.get_item(key).map_err(|e| Error::storage(js_message(&e))),
            BrowserStore::Memory(m) => m.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            BrowserStore::Local(s) => s
                .set_item(key, value)
                .map_err(|e| Error::storage(js_message(&e))),
            BrowserStore::Memory(m) => m.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match self {
            BrowserStore::Local(s) => s
                .remove_item(key)
                .map_err(|e| Error::storage(js_message(&e))),
            BrowserStore::Memory(m) => m.remove(key),
        }
    }
}

/// One-shot position request. Resolves when the browser answers; there is
/// no timeout.
pub async fn current_position() -> Result<Coords> {
    let window = web_sys::window().ok_or_else(|| Error::geolocation("no window"))?;
    let geolocation = window
        .navigator()
        .geolocation()
        .map_err(|e| Error::geolocation(js_message(&e)))?;

    let promise = Promise::new(&mut |resolve, reject| {
        if let Err(e) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject))
        {
            let _ = reject.call1(&JsValue::NULL, &e);
        }
    });

    let value = JsFuture::from(promise).await.map_err(|e| {
        let message = e
            .dyn_ref::<GeolocationPositionError>()
            .map(|err| err.message())
            .unwrap_or_else(|| js_message(&e));
        Error::geolocation(message)
    })?;

    let position: GeolocationPosition = value.unchecked_into();
    let coords = position.coords();
    Ok(Coords::new(coords.latitude(), coords.longitude()))
}

/// Blocking `window.alert`.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        window.alert_with_message(message).ok();
    }
}
