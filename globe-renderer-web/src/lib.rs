use std::cell::OnceCell;

use color_eyre::{
    Report, Result,
    eyre::{OptionExt, eyre},
};
use globe_renderer::{
    app::{ApplicationEvent, ApplicationRunner},
    control::ui_controller::RotationSpeedSource,
};
use tokio::sync::broadcast::error::RecvError;
use tokio_with_wasm::alias as tokio;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{HtmlCanvasElement, HtmlInputElement};
use winit::{event_loop::EventLoopProxy, window::Window};

thread_local! {
    pub static EVENT_LOOP_PROXY: OnceCell<EventLoopProxy<ApplicationEvent>> = OnceCell::new();
}

/// The `#rotationSpeed` range input, read on every frame.
pub struct SliderRotationSpeed {
    slider: HtmlInputElement,
}

impl SliderRotationSpeed {
    pub fn new(slider: HtmlInputElement) -> Self {
        Self { slider }
    }
}

impl RotationSpeedSource for SliderRotationSpeed {
    fn raw_value(&self) -> String {
        self.slider.value()
    }

    fn set_raw_value(&mut self, value: &str) {
        self.slider.set_value(value);
    }
}

fn get_element<T: JsCast>(id: &str) -> Result<T> {
    web_sys::window()
        .ok_or_eyre("Unable to get window")?
        .document()
        .ok_or_eyre("Unable to get document")?
        .get_element_by_id(id)
        .ok_or_else(|| eyre!("Unable to get element by id \"{id}\""))?
        .dyn_into::<T>()
        .map_err(|_| eyre!("Unable to convert \"{id}\" to {}", std::any::type_name::<T>()))
}

/// Lets the page push an auto-rotation speed, e.g. from a custom control.
#[wasm_bindgen]
pub fn set_rotation_speed(value: String) {
    EVENT_LOOP_PROXY.with(|cell| {
        if let Some(proxy) = cell.get() {
            if let Err(err) = proxy.send_event(ApplicationEvent::SetRotationSpeed(value)) {
                log::error!("{err}");
            }
        }
    })
}

fn run_application() -> Result<()> {
    use winit::platform::web::WindowAttributesExtWebSys;

    let canvas = get_element::<HtmlCanvasElement>("canvas")?;
    let window_attributes = Window::default_attributes().with_canvas(Some(canvas));
    let mut app_runner = ApplicationRunner::new(window_attributes)?;

    match get_element::<HtmlInputElement>("rotationSpeed") {
        Ok(slider) => {
            app_runner =
                app_runner.with_rotation_speed_source(Box::new(SliderRotationSpeed::new(slider)));
        }
        Err(err) => log::warn!("{err}, using the configured rotation speed"),
    }

    EVENT_LOOP_PROXY.with(|cell| cell.set(app_runner.get_event_loop_proxy()).ok());

    if let Some(mut notifications) = app_runner.subscribe_to_background_notifications() {
        tokio::spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(notification) => log::info!("{notification}"),
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("Skipped {skipped} loading notifications")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    if let Err(err) = app_runner.configure_background_runner(|f| tokio::spawn(f)) {
        log::error!("{err:?}");
    }

    Ok::<(), Report>(app_runner.run()?)
}

#[tokio::main(flavor = "multi_thread")]
pub async fn async_start() {
    #[cfg(feature = "console_error_panic_hook")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Could not initialize logger: {err}").into());
    }

    if let Err(err) = run_application() {
        log::error!("{err:?}");
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    async_start();
}
