use kurbo::Size;

use crate::ease::Ease;
use crate::stage::{NodeId, Stage};
use crate::tween::{Len, TweenSpec};

pub const SLIDE_DURATION: f64 = 3.0;
pub const SLIDE_STAGGER: f64 = 0.3;
/// Off-screen start offset in viewport-height units.
pub const SLIDE_OFFSET_VH: f64 = 120.0;

pub const GRID_SCALE_DURATION: f64 = 4.5;
pub const GRID_SCALE_DELAY: f64 = 1.2;

pub const RESIZE_DEBOUNCE: f64 = 0.1;

/// Direction a group of content blocks slides in from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GroupKind {
    /// The middle column; enters from below with no extra delay.
    Center,
    /// Outer columns entering from below.
    Forward,
    /// Columns entering from above, animated in reverse document order.
    Backward,
}

impl GroupKind {
    pub fn delay(self) -> f64 {
        match self {
            Self::Center => 0.0,
            Self::Forward => 0.4,
            Self::Backward => 0.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SlideGroup {
    pub kind: GroupKind,
    pub nodes: Vec<NodeId>,
}

pub fn slide_from(kind: GroupKind) -> Len {
    match kind {
        GroupKind::Backward => Len::vh(-SLIDE_OFFSET_VH),
        GroupKind::Center | GroupKind::Forward => Len::vh(SLIDE_OFFSET_VH),
    }
}

/// Rest offset for a group. Backward columns settle at half the scaled
/// content height instead of zero; this compensates for their different rest
/// position and is a fixed design constant, not derived from the others.
pub fn slide_to(kind: GroupKind, scaled_content: Size) -> Len {
    match kind {
        GroupKind::Backward => Len::px(scaled_content.height / 2.0),
        GroupKind::Center | GroupKind::Forward => Len::ZERO,
    }
}

pub fn slide_spec(kind: GroupKind) -> TweenSpec {
    TweenSpec {
        duration: SLIDE_DURATION,
        delay: kind.delay(),
        ease: Ease::InOutExpo,
        stagger: SLIDE_STAGGER,
    }
}

/// The five entry groups in play order: center (column three), the two
/// forward columns (one, five), and the two backward columns (four, two)
/// with their element order reversed before animating.
pub fn collect_groups(stage: &dyn Stage) -> Vec<SlideGroup> {
    let column = |name: &str| stage.query_all(&format!(".column.{name} .item .content"));
    let reversed = |name: &str| {
        let mut nodes = column(name);
        nodes.reverse();
        nodes
    };

    vec![
        SlideGroup {
            kind: GroupKind::Center,
            nodes: column("three"),
        },
        SlideGroup {
            kind: GroupKind::Forward,
            nodes: column("one"),
        },
        SlideGroup {
            kind: GroupKind::Forward,
            nodes: column("five"),
        },
        SlideGroup {
            kind: GroupKind::Backward,
            nodes: reversed("four"),
        },
        SlideGroup {
            kind: GroupKind::Backward,
            nodes: reversed("two"),
        },
    ]
}
