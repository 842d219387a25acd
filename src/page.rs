//! Page skeleton
//!
//! The static frame every render starts from: hero, three reveal-marked
//! case sections and the four mount points the loader fills. Serialises to a
//! complete HTML document with the stylesheet inlined and, optionally, the
//! wasm bootstrap that runs the loader and reveal controller in the browser.

use crate::dom::Element;
use crate::loader::{SlotId, Slots};
use crate::reveal::{READY_CLASS, REVEAL_ATTR};

// Embed the stylesheet directly in the page
const PAGE_CSS: &str = include_str!("page.css");

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    /// Module path of the wasm-bindgen JS glue. `None` emits no script.
    pub script_src: Option<String>,
    /// Wire `load_page()` so the browser fetches and renders the data.
    /// Off for pre-rendered pages, which only need the reveal controller.
    pub runtime_load: bool,
    /// Stamp written to `<meta name="generated">`.
    pub generated: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Through-Wall Audio Leakage & Response Injection".to_string(),
            script_src: Some("./pkg/wallcast_web.js".to_string()),
            runtime_load: true,
            generated: None,
        }
    }
}

struct SectionCopy {
    id: &'static str,
    heading: &'static str,
    lede: &'static str,
    slots: &'static [SlotId],
}

const SECTIONS: &[SectionCopy] = &[
    SectionCopy {
        id: "case1",
        heading: "Case 1: Speech leakage",
        lede: "Each sentence was spoken in one room and captured from the other side of the wall.",
        slots: &[SlotId::Case1Audio],
    },
    SectionCopy {
        id: "case2",
        heading: "Case 2: Speech leakage across speakers",
        lede: "The same setup repeated with different voices and wall materials.",
        slots: &[SlotId::Case2Audio],
    },
    SectionCopy {
        id: "case3",
        heading: "Case 3: Response injection",
        lede: "An attacker overhears the query, then answers it first over the injection channel.",
        slots: &[SlotId::Case3Table, SlotId::Case3Audio],
    },
];

#[derive(Debug, Clone)]
pub struct Page {
    root: Element,
}

impl Page {
    pub fn new(options: &PageOptions) -> Self {
        let mut head = Element::new("head")
            .child(Element::new("meta").attr("charset", "utf-8"))
            .child(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            );
        if let Some(ref generated) = options.generated {
            head = head.child(Element::new("meta").attr("name", "generated").attr("content", generated.as_str()));
        }
        head = head
            .child(Element::new("title").text(options.title.as_str()))
            .child(Element::new("style").raw(PAGE_CSS));

        let hero = Element::new("header")
            .class("hero")
            .id("top")
            .flag(REVEAL_ATTR)
            .child(Element::new("h1").text(options.title.as_str()))
            .child(
                Element::new("p")
                    .class("case-meta")
                    .text("Listen to what leaks through the wall, and what an attacker can send back."),
            );

        let main = Element::new("main").children(SECTIONS.iter().map(section));

        let mut body = Element::new("body").child(hero).child(main);
        if let Some(ref src) = options.script_src {
            body = body.child(
                Element::new("script")
                    .attr("type", "module")
                    .raw(bootstrap_script(src, options.runtime_load)),
            );
        }

        let root = Element::new("html").attr("lang", "en").child(head).child(body);
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn slot_element(&self, id: SlotId) -> Option<&Element> {
        self.root.find_by_id(id.element_id())
    }

    /// Ids of the reveal-marked elements, in document order.
    pub fn reveal_targets(&self) -> Vec<&str> {
        self.root
            .find_all_with_attr(REVEAL_ATTR)
            .into_iter()
            .filter_map(|e| e.get_attr("id"))
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        self.root.write_html(&mut out);
        out.push('\n');
        out
    }
}

impl Slots for Page {
    type Slot = Element;

    fn slot(&mut self, id: SlotId) -> Option<&mut Element> {
        self.root.find_by_id_mut(id.element_id())
    }
}

fn section(copy: &SectionCopy) -> Element {
    Element::new("section")
        .class("case")
        .id(copy.id)
        .flag(REVEAL_ATTR)
        .child(Element::new("h2").text(copy.heading))
        .child(Element::new("p").class("lede").text(copy.lede))
        .children(copy.slots.iter().map(|slot| {
            Element::new("div")
                .class("slot")
                .id(slot.element_id())
        }))
}

fn bootstrap_script(src: &str, runtime_load: bool) -> String {
    // `src` is ours (CLI flag or default), but keep it inside a JS string literal
    let src = src.replace('\\', "\\\\").replace('\'', "\\'").replace("</", "<\\/");
    if runtime_load {
        format!("import init, {{ load_page }} from '{}';\ninit().then(() => load_page());", src)
    } else {
        format!("import init from '{}';\ninit();", src)
    }
}
