//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

use globe_renderer::control::ui_controller::RotationSpeedSource;
use globe_renderer_web::SliderRotationSpeed;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlInputElement;

wasm_bindgen_test_configure!(run_in_browser);

fn slider(value: &str) -> HtmlInputElement {
    let slider = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.create_element("input").ok())
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .unwrap();
    slider.set_value(value);
    slider
}

#[wasm_bindgen_test]
fn slider_value_is_the_rotation_speed() {
    let source = SliderRotationSpeed::new(slider("0.004"));

    assert_eq!(source.speed(), 0.004);
}

#[wasm_bindgen_test]
fn empty_slider_stops_the_rotation() {
    let source = SliderRotationSpeed::new(slider(""));

    assert_eq!(source.speed(), 0.0);
}

#[wasm_bindgen_test]
fn pushed_values_update_the_slider() {
    let mut source = SliderRotationSpeed::new(slider("0.001"));

    source.set_raw_value("0.01");

    assert_eq!(source.raw_value(), "0.01");
}
