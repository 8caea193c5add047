use kurbo::Size;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::ease::Ease;
use crate::error::{GridstageError, GridstageResult};
use crate::layout::{StageLayout, validate_content_rect};
use crate::slide::{
    GRID_SCALE_DELAY, GRID_SCALE_DURATION, RESIZE_DEBOUNCE, SlideGroup, collect_groups, slide_from,
    slide_spec, slide_to,
};
use crate::stage::{NodeId, Stage};
use crate::tween::{
    ScaleBinding, ScaleTarget, Timeline, TweenEventKind, TweenId, TweenProp, TweenSpec,
};

/// Lifecycle of the grid container's scale-up animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScalePhase {
    Idle,
    Animating,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    ScaleStarted,
    ScaleCompleted,
}

/// Pure transition function. Phases only ever move forward; a replacement
/// tween re-reporting a start while already animating is absorbed.
pub fn phase_transition(phase: ScalePhase, event: PhaseEvent) -> ScalePhase {
    match (phase, event) {
        (ScalePhase::Idle, PhaseEvent::ScaleStarted) => ScalePhase::Animating,
        (ScalePhase::Animating, PhaseEvent::ScaleCompleted) => ScalePhase::Complete,
        (phase, _) => phase,
    }
}

fn scale_spec() -> TweenSpec {
    TweenSpec {
        duration: GRID_SCALE_DURATION,
        delay: GRID_SCALE_DELAY,
        ease: Ease::InOutExpo,
        stagger: 0.0,
    }
}

/// Drives the page-load entry animation and re-adapts it on viewport resize.
///
/// Owns the stage, the timeline, and all process state the distilled page
/// script kept in free bindings: the current layout, the shared scale
/// binding, the grid scale phase, and the live grid tween handle.
pub struct Sequencer<S: Stage> {
    stage: S,
    timeline: Timeline,
    content_rect: Size,
    layout: StageLayout,
    scale_binding: ScaleBinding,
    phase: ScalePhase,
    grid: NodeId,
    image: Option<NodeId>,
    groups: Vec<SlideGroup>,
    grid_tween: Option<TweenId>,
    debouncer: Debouncer,
    frame_pending: bool,
}

impl<S: Stage> Sequencer<S> {
    /// Measures the content block, validates the startup preconditions and
    /// computes the initial layout. The content rect is captured once here
    /// and assumed immutable afterwards.
    pub fn new(stage: S) -> GridstageResult<Self> {
        let grid = stage
            .query("#grid")
            .ok_or_else(|| GridstageError::validation("grid container '#grid' not found"))?;
        let content = stage
            .query(".content")
            .ok_or_else(|| GridstageError::validation("no '.content' blocks found"))?;

        let content_rect = stage.measure(content);
        validate_content_rect(content_rect)?;

        let groups = collect_groups(&stage);
        let image = stage.query(".content.home img");
        let layout = StageLayout::compute(content_rect, stage.viewport());
        let scale_binding = ScaleBinding::new(layout.content_scale);

        Ok(Self {
            stage,
            timeline: Timeline::new(),
            content_rect,
            layout,
            scale_binding,
            phase: ScalePhase::Idle,
            grid,
            image,
            groups,
            grid_tween: None,
            debouncer: Debouncer::new(RESIZE_DEBOUNCE),
            frame_pending: false,
        })
    }

    /// Play the entry sequence: five slide groups, the grid scale-up and the
    /// image settle, then one unconditional reconcile to establish sizing.
    pub fn start(&mut self) {
        for group in self.groups.clone() {
            self.timeline.from_to(
                group.nodes,
                TweenProp::TranslateY {
                    from: slide_from(group.kind),
                    to: slide_to(group.kind, self.layout.scaled_content),
                },
                slide_spec(group.kind),
            );
        }

        // Target read from the shared binding at start time, so a resize
        // during the delay retargets the pending tween for free.
        let grid_tween = self.timeline.from_to(
            vec![self.grid],
            TweenProp::Scale {
                from: None,
                to: ScaleTarget::Binding(self.scale_binding.clone()),
            },
            scale_spec(),
        );
        self.grid_tween = Some(grid_tween);

        if let Some(image) = self.image {
            self.timeline.from_to(
                vec![image],
                TweenProp::Scale {
                    from: None,
                    to: ScaleTarget::Value(1.0),
                },
                scale_spec(),
            );
        }

        self.reconcile();
    }

    /// Called for every raw resize event; actual reconciliation is debounced.
    pub fn notify_resize(&mut self, now: f64) {
        self.debouncer.trigger(now);
    }

    /// One frame of the cooperative loop: apply deferred content sizing from
    /// the previous frame, fire a due reconcile, advance the timeline, fold
    /// its events into the phase machine.
    pub fn tick(&mut self, now: f64, dt: f64) {
        if self.frame_pending {
            self.apply_content_sizes();
            self.frame_pending = false;
        }

        if self.debouncer.poll(now) {
            self.reconcile();
        }

        let events = self.timeline.tick(dt, &mut self.stage);
        for event in events {
            if Some(event.id) != self.grid_tween {
                continue;
            }
            let phase_event = match event.kind {
                TweenEventKind::Started => PhaseEvent::ScaleStarted,
                TweenEventKind::Completed => PhaseEvent::ScaleCompleted,
            };
            let next = phase_transition(self.phase, phase_event);
            if next != self.phase {
                debug!(from = ?self.phase, to = ?next, "grid scale phase transition");
                self.phase = next;
            }
        }
    }

    /// Recompute the layout for the current viewport and bring the grid
    /// scale animation along without a visible jump.
    #[tracing::instrument(skip(self), fields(phase = ?self.phase))]
    pub fn reconcile(&mut self) {
        let prev_scale = self.layout.content_scale;
        self.layout = StageLayout::compute(self.content_rect, self.stage.viewport());
        self.scale_binding.set(self.layout.content_scale);

        match self.phase {
            ScalePhase::Animating => {
                if let Some(old) = self.grid_tween {
                    let progress = self.timeline.progress(old);
                    self.timeline.kill(old);

                    // Express the start as a ratio of new to old target so the
                    // on-screen scale stays continuous across the retarget.
                    let replacement = self.timeline.from_to(
                        vec![self.grid],
                        TweenProp::Scale {
                            from: Some(self.layout.content_scale / prev_scale),
                            to: ScaleTarget::Binding(self.scale_binding.clone()),
                        },
                        scale_spec(),
                    );
                    self.timeline
                        .seek(replacement, GRID_SCALE_DURATION * progress);
                    self.grid_tween = Some(replacement);
                    debug!(
                        progress,
                        prev_scale,
                        new_scale = self.layout.content_scale,
                        "retargeted grid scale tween"
                    );
                }
            }
            ScalePhase::Complete => {
                // Entry sequence is over; resizing snaps instantly.
                self.stage.set_scale(self.grid, self.layout.content_scale);
            }
            ScalePhase::Idle => {}
        }

        // Content blocks are resized on the next frame, batched with paint.
        self.frame_pending = true;
    }

    fn apply_content_sizes(&mut self) {
        for node in self.stage.query_all(".content") {
            self.stage.set_size_px(node, self.layout.scaled_content);
        }
    }

    pub fn phase(&self) -> ScalePhase {
        self.phase
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    pub fn grid(&self) -> NodeId {
        self.grid
    }

    pub fn grid_progress(&self) -> f64 {
        self.grid_tween
            .map(|id| self.timeline.progress(id))
            .unwrap_or(0.0)
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }
}
