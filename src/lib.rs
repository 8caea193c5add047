#![forbid(unsafe_code)]

pub mod debounce;
pub mod ease;
pub mod error;
pub mod layout;
pub mod scenario;
pub mod sequencer;
pub mod slide;
pub mod stage;
pub mod tween;

pub use debounce::Debouncer;
pub use ease::Ease;
pub use error::{GridstageError, GridstageResult};
pub use layout::{StageLayout, cover_scale};
pub use scenario::{ResizeEvent, Scenario, TraceSample, simulate};
pub use sequencer::{PhaseEvent, ScalePhase, Sequencer, phase_transition};
pub use slide::{GroupKind, SlideGroup, collect_groups};
pub use stage::{MemoryStage, NodeId, Stage};
pub use tween::{
    Len, ScaleBinding, ScaleTarget, Timeline, TweenEvent, TweenEventKind, TweenId, TweenProp,
    TweenSpec, Unit,
};
