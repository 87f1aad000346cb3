//! Browser smoke tests; run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use scroll_motion::dom::{Document, ObserverKind, Selector};
use scroll_motion::web::create_engine;
use scroll_motion::{refresh_animations, EngineConfig, MotionEngine};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn append_div(class: &str) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div = document
        .create_element("div")
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    div.set_class_name(class);
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn refresh_before_any_engine_is_noop() {
    refresh_animations();
}

#[wasm_bindgen_test]
fn engine_starts_with_defaults() {
    let engine = MotionEngine::new().unwrap();
    engine.refresh();
    engine.refresh();
    refresh_animations();
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    assert!(MotionEngine::with_config("reveal:\n  threshold: 7\n").is_err());
}

#[wasm_bindgen_test]
fn query_finds_live_elements() {
    append_div("web-test-marker");
    append_div("web-test-marker animated");

    let engine = create_engine(EngineConfig::default()).unwrap();
    let mut engine = engine.borrow_mut();
    let found = engine
        .document_mut()
        .query_all(&Selector::classes(&["web-test-marker"]).without("animated"));

    assert_eq!(found.len(), 1);
    let el = found[0];
    engine.document_mut().add_class(el, "animated");
    assert!(engine.document().has_class(el, "animated"));
    engine.document_mut().unobserve(ObserverKind::Reveal, el);
}

#[wasm_bindgen_test]
fn element_ids_are_stable_across_queries() {
    let div = append_div("web-test-stable");

    let engine = create_engine(EngineConfig::default()).unwrap();
    let mut engine = engine.borrow_mut();
    let selector = Selector::classes(&["web-test-stable"]);
    let first = engine.document_mut().query_all(&selector);
    let second = engine.document_mut().query_all(&selector);

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
    assert_eq!(engine.document().id_of(&div), Some(first[0]));

    let stranger = append_div("web-test-unqueried");
    assert_eq!(engine.document().id_of(&stranger), None);
}
