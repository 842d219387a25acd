use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wallcast::dom::{Container, Element};
use wallcast::loader::{DataLoader, Diagnostics, LoadError, LoadState, SlotId, Slots, DATA_PATH};
use wallcast::model::AudioData;
use wallcast::reveal::{IntersectionEntry, RevealController, READY_CLASS, REVEAL_ATTR, REVEAL_THRESHOLD, VISIBLE_CLASS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Response};

thread_local! {
    static LOADER: RefCell<DataLoader> = RefCell::new(DataLoader::new());
    static LOAD_STARTED: Cell<bool> = const { Cell::new(false) };
}

/// Mount point in the live document.
struct DomSlot(web_sys::Element);

impl Container for DomSlot {
    fn append(&mut self, element: Element) {
        // Markup comes from the escaped element tree, never from raw data
        if let Err(e) = self.0.insert_adjacent_html("beforeend", &element.to_html()) {
            web_sys::console::error_1(&e);
        }
    }
}

struct DocumentSlots(HashMap<SlotId, DomSlot>);

impl DocumentSlots {
    fn from_document(document: &web_sys::Document) -> Self {
        let slots = SlotId::ALL
            .iter()
            .filter_map(|id| {
                document
                    .get_element_by_id(id.element_id())
                    .map(|el| (*id, DomSlot(el)))
            })
            .collect();
        Self(slots)
    }
}

impl Slots for DocumentSlots {
    type Slot = DomSlot;

    fn slot(&mut self, id: SlotId) -> Option<&mut DomSlot> {
        self.0.get_mut(&id)
    }
}

struct Console;

impl Diagnostics for Console {
    fn error(&mut self, message: &str) {
        web_sys::console::error_1(&message.into());
    }
}

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn fetch_data() -> Result<AudioData, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Fetch("no window".to_string()))?;

    let response_value = JsFuture::from(window.fetch_with_str(DATA_PATH))
        .await
        .map_err(|e| LoadError::Fetch(js_error(&e)))?;
    let response: Response = response_value
        .dyn_into()
        .map_err(|_| LoadError::Fetch("fetch() returned unexpected type".to_string()))?;
    if !response.ok() {
        return Err(LoadError::Fetch(format!("HTTP {} for {}", response.status(), DATA_PATH)));
    }

    let body = response.json().map_err(|e| LoadError::Decode(js_error(&e)))?;
    let json = JsFuture::from(body)
        .await
        .map_err(|e| LoadError::Decode(js_error(&e)))?;

    serde_wasm_bindgen::from_value(json).map_err(|e| LoadError::Decode(e.to_string()))
}

/// Fetch the data file and render every section. Only the first call per
/// page view does anything.
#[wasm_bindgen]
pub fn load_page() {
    if LOAD_STARTED.with(|started| started.replace(true)) {
        return;
    }

    wasm_bindgen_futures::spawn_local(async {
        let outcome = fetch_data().await;

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            Console.error("Failed to load audio data: no document");
            return;
        };
        let mut slots = DocumentSlots::from_document(&document);

        LOADER.with(|loader| {
            loader.borrow_mut().finish(outcome, &mut slots, &mut Console);
        });
    });
}

/// `"loading"`, `"rendered"` or `"failed"`.
#[wasm_bindgen]
pub fn load_state() -> String {
    let state = LOADER.with(|loader| loader.borrow().state());
    match state {
        LoadState::Loading => "loading",
        LoadState::Rendered => "rendered",
        LoadState::Failed => "failed",
    }
    .to_string()
}

/// Observe every reveal-marked element present right now. Elements added
/// later are never observed.
fn start_reveal() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let nodes = document.query_selector_all(&format!("[{}]", REVEAL_ATTR))?;
    let elements: Rc<Vec<web_sys::Element>> = Rc::new(
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect(),
    );
    if elements.is_empty() {
        return Ok(());
    }

    let controller = Rc::new(RefCell::new(RevealController::new(REVEAL_THRESHOLD)));

    let callback = {
        let elements = Rc::clone(&elements);
        let controller = Rc::clone(&controller);
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let batch: Vec<IntersectionEntry<usize>> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        let key = elements.iter().position(|e| *e == target)?;
                        Some(IntersectionEntry::new(key, entry.is_intersecting(), entry.intersection_ratio()))
                    })
                    .collect();

                for key in controller.borrow_mut().handle(batch) {
                    let element = &elements[key];
                    if let Err(e) = element.class_list().add_1(VISIBLE_CLASS) {
                        web_sys::console::error_1(&e);
                    }
                    observer.unobserve(element);
                }
            },
        )
    };

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(controller.borrow().threshold()));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;

    // Targets only start hidden once something is watching them
    if let Some(root) = document.document_element() {
        root.class_list().add_1(READY_CLASS)?;
    }

    for (key, element) in elements.iter().enumerate() {
        controller.borrow_mut().observe(key);
        observer.observe(element);
    }

    // The observer lives as long as the page
    callback.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    start_reveal()
}
