//! Labelled audio player

use crate::dom::Element;

/// `<div class="audio-row"><span>label</span><audio controls preload="none" src=…></audio></div>`
///
/// `preload="none"` keeps the browser from touching the media until the
/// visitor presses play. An empty `src` still yields a (dead) control.
pub fn audio_row(label: &str, src: &str) -> Element {
    Element::new("div")
        .class("audio-row")
        .child(Element::new("span").text(label))
        .child(
            Element::new("audio")
                .flag("controls")
                .attr("preload", "none")
                .attr("src", src),
        )
}
