use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use js_sys::{Array, Function, Object, Reflect, WeakMap};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use super::{with_engine, WebEngine};
use crate::dom::{Document, ElementId, IntersectionEntry, ObserverKind, ObserverOptions, Rect, Selector};
use crate::error::{EngineError, Result};

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// [`Document`] over the live page
///
/// Elements get an [`ElementId`] the first time a query returns them; the
/// id stays valid for the lifetime of the engine even if the node is removed.
/// Node to id lookups go through a `WeakMap` keyed by the node itself.
pub struct WebDocument {
    window: Window,
    document: web_sys::Document,
    elements: Vec<Element>,
    ids: WeakMap,
    observers: HashMap<ObserverKind, (IntersectionObserver, ObserverCallback)>,
    engine: Weak<RefCell<WebEngine>>,
}

impl WebDocument {
    pub fn new(window: Window, document: web_sys::Document, engine: Weak<RefCell<WebEngine>>) -> Self {
        Self {
            window,
            document,
            elements: Vec::new(),
            ids: WeakMap::new(),
            observers: HashMap::new(),
            engine,
        }
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.index())
    }

    /// Id of an element previously returned by a query
    pub fn id_of(&self, element: &Element) -> Option<ElementId> {
        let key: &Object = element.as_ref();
        let index = self.ids.get(key).as_f64()? as usize;
        (self.elements.get(index) == Some(element)).then_some(ElementId(index))
    }

    fn register(&mut self, element: Element) -> ElementId {
        if let Some(id) = self.id_of(&element) {
            return id;
        }
        let id = ElementId(self.elements.len());
        let key: &Object = element.as_ref();
        self.ids.set(key, &JsValue::from_f64(id.index() as f64));
        self.elements.push(element);
        id
    }

    fn create_observer(&self, kind: ObserverKind, options: &ObserverOptions) -> Result<(IntersectionObserver, ObserverCallback)> {
        let supported = Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        if !supported {
            return Err(EngineError::CapabilityMissing("IntersectionObserver"));
        }

        let engine = self.engine.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                with_engine(&engine, |engine| {
                    let reports: Vec<IntersectionEntry> = entries
                        .iter()
                        .filter_map(|value| {
                            let entry = value.dyn_into::<IntersectionObserverEntry>().ok()?;
                            let target = engine.document().id_of(&entry.target())?;
                            Some(IntersectionEntry {
                                target,
                                ratio: entry.intersection_ratio(),
                                is_intersecting: entry.is_intersecting(),
                            })
                        })
                        .collect();
                    engine.on_intersection(kind, &reports);
                });
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|e| EngineError::Host(format!("IntersectionObserver: {:?}", e)))?;

        Ok((observer, callback))
    }
}

impl Document for WebDocument {
    fn query_all(&mut self, selector: &Selector) -> Vec<ElementId> {
        if selector.is_empty() {
            return Vec::new();
        }

        let css = selector.to_css();
        let list = match self.document.query_selector_all(&css) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("Invalid selector {}: {:?}", css, e);
                return Vec::new();
            }
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.register(element))
            .collect()
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .map(|e| e.class_list().contains(class))
            .unwrap_or(false)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(element) = self.element(el) {
            let _ = element.class_list().add_1(class);
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn text(&self, el: ElementId) -> String {
        self.element(el)
            .and_then(|e| e.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(element) = self.element(el) {
            element.set_text_content(Some(text));
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(element) = self.element(el).and_then(|e| e.dyn_ref::<HtmlElement>()) else {
            return;
        };
        let _ = element.style().set_property(property, value);
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.element(el)
            .map(|e| {
                let r = e.get_bounding_client_rect();
                Rect::new(r.x(), r.y(), r.width(), r.height())
            })
            .unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn media_matches(&self, query: &str) -> Option<bool> {
        let match_media = Reflect::get(&self.window, &"matchMedia".into()).ok()?;
        let match_media = match_media.dyn_into::<Function>().ok()?;
        let list = match_media.call1(&self.window, &query.into()).ok()?;
        Reflect::get(&list, &"matches".into()).ok()?.as_bool()
    }

    fn observe(&mut self, kind: ObserverKind, options: &ObserverOptions, el: ElementId) -> Result<()> {
        if !self.observers.contains_key(&kind) {
            let created = self.create_observer(kind, options)?;
            self.observers.insert(kind, created);
        }

        let (Some((observer, _)), Some(element)) = (self.observers.get(&kind), self.element(el)) else {
            return Ok(());
        };
        observer.observe(element);
        Ok(())
    }

    fn unobserve(&mut self, kind: ObserverKind, el: ElementId) {
        if let (Some((observer, _)), Some(element)) = (self.observers.get(&kind), self.element(el)) {
            observer.unobserve(element);
        }
    }

    fn format_integer(&self, value: u64) -> String {
        js_sys::Number::from(value as f64)
            .to_locale_string("default")
            .into()
    }
}
