use swipekit_ui_graphics::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanPhase {
    Begin,
    Update,
    End,
    Cancel,
}

/// One event of the platform's pan stream.
///
/// `translation` is measured from where the pan began; `position` is the
/// pointer location in the gesture surface's local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    pub translation: Point,
    pub position: Point,
    /// Only meaningful on `End`; platforms that do not track velocity leave it `None`.
    pub velocity: Option<Point>,
}

impl PanEvent {
    pub fn begin(position: Point) -> Self {
        Self {
            phase: PanPhase::Begin,
            translation: Point::ZERO,
            position,
            velocity: None,
        }
    }

    pub fn update(translation: Point, position: Point) -> Self {
        Self {
            phase: PanPhase::Update,
            translation,
            position,
            velocity: None,
        }
    }

    pub fn end(translation: Point, position: Point, velocity: Option<Point>) -> Self {
        Self {
            phase: PanPhase::End,
            translation,
            position,
            velocity,
        }
    }

    pub fn cancel() -> Self {
        Self {
            phase: PanPhase::Cancel,
            translation: Point::ZERO,
            position: Point::ZERO,
            velocity: None,
        }
    }
}

/// Final state of a pan at release.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PanRelease {
    pub translation: Point,
    /// Pointer location inside the gesture surface at release.
    pub position: Point,
    pub velocity: Point,
}

impl PanRelease {
    pub fn new(translation: Point, position: Point, velocity: Point) -> Self {
        Self {
            translation,
            position,
            velocity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// The pointer never left the touch slop; `Point` is the local tap position.
    Tap(Point),
    Pan(PanRelease),
}
