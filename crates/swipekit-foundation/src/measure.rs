use swipekit_ui_graphics::Rect;

/// Synchronous layout query for an element's bounding box.
///
/// Returns `None` while the element has not been laid out; callers treat
/// that as "unavailable" and never retry.
pub trait LayoutMeasurer {
    fn measure(&self) -> Option<Rect>;
}

impl<F> LayoutMeasurer for F
where
    F: Fn() -> Option<Rect>,
{
    fn measure(&self) -> Option<Rect> {
        self()
    }
}

/// Box that stores whatever the layout pass last reported.
#[derive(Debug, Default)]
pub struct LayoutSlot {
    bounds: std::cell::Cell<Option<Rect>>,
}

impl LayoutSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, bounds: Rect) {
        self.bounds.set(Some(bounds));
    }

    pub fn clear(&self) {
        self.bounds.set(None);
    }
}

impl LayoutMeasurer for LayoutSlot {
    fn measure(&self) -> Option<Rect> {
        self.bounds.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_measure() {
        let measurer = || Some(Rect::new(0.0, 0.0, 320.0, 480.0));
        assert_eq!(measurer.measure().map(|rect| rect.width), Some(320.0));
    }

    #[test]
    fn slot_reports_the_last_layout() {
        let slot = LayoutSlot::new();
        assert_eq!(slot.measure(), None);
        slot.set(Rect::new(4.0, 8.0, 100.0, 50.0));
        assert_eq!(slot.measure(), Some(Rect::new(4.0, 8.0, 100.0, 50.0)));
        slot.clear();
        assert_eq!(slot.measure(), None);
    }
}
