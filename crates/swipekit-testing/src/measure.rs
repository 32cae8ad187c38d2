use swipekit_ui_graphics::Rect;

/// Measurer that always reports a laid-out box of `width × height` at the origin.
pub fn fixed_bounds(width: f32, height: f32) -> impl Fn() -> Option<Rect> + 'static {
    move || Some(Rect::new(0.0, 0.0, width, height))
}

/// Measurer for an element that has not been laid out yet.
pub fn unmeasured() -> impl Fn() -> Option<Rect> + 'static {
    || None
}
