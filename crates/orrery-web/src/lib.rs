use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use orrery::InputEvent;

pub mod runner;

pub use runner::OrreryRunner;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Orrery not initialized. Call orrery_init() first.");
        f(runner)
    })
}

/// Build the system from a manifest. Pass an empty string for the built-in
/// solar system.
#[wasm_bindgen]
pub fn orrery_init(manifest_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = OrreryRunner::from_json(manifest_json).map_err(|e| {
        log::error!("orrery: {e}");
        JsValue::from_str(&e.to_string())
    })?;
    let bodies = runner.body_count();

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });

    log::info!("orrery: initialized with {bodies} bodies");
    Ok(())
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f64) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn orrery_pointer_click(x: f64, y: f64) {
    with_runner(|r| r.push_input(InputEvent::PointerClick { x, y }));
}

#[wasm_bindgen]
pub fn orrery_user_control_start() {
    with_runner(|r| r.push_input(InputEvent::UserControlStart));
}

/// Camera pose produced by the user's controls: position then look-at.
#[wasm_bindgen]
pub fn orrery_user_control_change(px: f64, py: f64, pz: f64, tx: f64, ty: f64, tz: f64) {
    with_runner(|r| r.user_control_change([px, py, pz], [tx, ty, tz]));
}

#[wasm_bindgen]
pub fn orrery_request_focus(name: &str) {
    with_runner(|r| r.push_input(InputEvent::RequestFocus { name: name.to_string() }));
}

#[wasm_bindgen]
pub fn orrery_request_reset() {
    with_runner(|r| r.push_input(InputEvent::RequestReset));
}

#[wasm_bindgen]
pub fn orrery_remove_body(name: &str) {
    with_runner(|r| r.push_input(InputEvent::RemoveBody { name: name.to_string() }));
}

#[wasm_bindgen]
pub fn orrery_set_animation_enabled(enabled: bool) {
    with_runner(|r| r.push_input(InputEvent::SetAnimationEnabled(enabled)));
}

#[wasm_bindgen]
pub fn orrery_set_time_scale(days_per_second: f64) {
    with_runner(|r| r.push_input(InputEvent::SetTimeScale(days_per_second)));
}

#[wasm_bindgen]
pub fn orrery_set_epoch_days(days: f64) {
    with_runner(|r| r.push_input(InputEvent::SetEpochDays(days)));
}

#[wasm_bindgen]
pub fn orrery_resize(width: f64, height: f64) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

/// Name of the body with the given id, as found in buffer records.
#[wasm_bindgen]
pub fn orrery_body_name(id: u32) -> Option<String> {
    with_runner(|r| r.body_name(id))
}

#[wasm_bindgen]
pub fn orrery_body_names() -> js_sys::Array {
    with_runner(|r| r.body_names().into_iter().map(JsValue::from).collect())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr())
}

#[wasm_bindgen]
pub fn get_buffer_len() -> u32 {
    with_runner(|r| r.buffer_len())
}

#[wasm_bindgen]
pub fn get_body_count() -> u32 {
    with_runner(|r| r.body_count())
}

#[wasm_bindgen]
pub fn get_event_count() -> u32 {
    with_runner(|r| r.event_count())
}

#[wasm_bindgen]
pub fn get_body_data_offset() -> u32 {
    with_runner(|r| r.body_data_offset())
}

#[wasm_bindgen]
pub fn get_event_data_offset() -> u32 {
    with_runner(|r| r.event_data_offset())
}
