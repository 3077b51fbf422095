// Inline CSS for the DOM pieces the widget creates. Kept free of web-sys so
// host-side tests can include it directly.

#[inline]
pub fn px(value: u32) -> String {
    format!("{}px", value)
}

/// Legend panel root: bottom-right of the container, translucent, scrolls
/// vertically once it reaches `max_height_px`.
pub fn legend_panel_css(width_px: u32, max_height_px: u32) -> String {
    format!(
        "position:absolute;bottom:0px;right:0px;z-index:10;\
         width:{};max-height:{};overflow-y:auto;overflow-x:hidden;\
         border-radius:10px;background-color:rgba(255,255,255,0.4);\
         padding:4px;box-sizing:border-box;cursor:pointer;",
        px(width_px),
        px(max_height_px)
    )
}

pub const LEGEND_PLACEHOLDER_CSS: &str =
    "display:none;font-size:20px;line-height:20px;text-align:center;user-select:none;";

/// Axis-label canvas stretched over the render window. Never takes pointer
/// events away from the interactor.
pub const LABEL_CANVAS_CSS: &str =
    "position:absolute;top:0px;left:0px;width:100%;height:100%;pointer-events:none;";

#[inline]
pub fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

/// `None` means the panel sizes itself to its content.
pub fn height_value(height_px: Option<u32>) -> String {
    match height_px {
        Some(h) => px(h),
        None => "auto".to_string(),
    }
}
