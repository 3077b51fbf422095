// Host-side tests for the inline CSS builders.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod style {
    include!("../src/style.rs");
}

use style::*;

#[test]
fn panel_css_carries_width_and_scroll_bound() {
    let css = legend_panel_css(350, 400);
    assert!(css.contains("width:350px;"));
    assert!(css.contains("max-height:400px;"));
    assert!(css.contains("overflow-y:auto;"));
    assert!(css.contains("position:absolute;"));
}

#[test]
fn collapsed_height_is_fixed_and_expanded_is_automatic() {
    assert_eq!(height_value(Some(30)), "30px");
    assert_eq!(height_value(None), "auto");
}

#[test]
fn label_canvas_never_takes_pointer_events() {
    assert!(LABEL_CANVAS_CSS.contains("pointer-events:none;"));
}

#[test]
fn placeholder_starts_hidden() {
    assert!(LEGEND_PLACEHOLDER_CSS.starts_with("display:none;"));
    assert_eq!(display(true), "block");
    assert_eq!(display(false), "none");
}
