use std::cell::Cell;
use std::rc::Rc;

use kurbo::Size;

use crate::ease::Ease;
use crate::stage::{NodeId, Stage};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Unit {
    Px,
    /// Viewport-height units; resolved against the stage viewport when the
    /// tween starts, not when it is created.
    Vh,
}

/// A translate-y length with its unit.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Len {
    pub value: f64,
    pub unit: Unit,
}

impl Len {
    pub const ZERO: Len = Len {
        value: 0.0,
        unit: Unit::Px,
    };

    pub fn px(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub fn vh(value: f64) -> Self {
        Self {
            value,
            unit: Unit::Vh,
        }
    }

    pub fn resolve(self, viewport: Size) -> f64 {
        match self.unit {
            Unit::Px => self.value,
            Unit::Vh => self.value / 100.0 * viewport.height,
        }
    }
}

/// Timing parameters shared by every tween.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct TweenSpec {
    pub duration: f64,
    pub delay: f64,
    pub ease: Ease,
    /// Per-element start offset within a multi-target tween.
    pub stagger: f64,
}

/// Shared mutable scale value, read by a tween when it leaves its delay.
///
/// The sequencer and the reconciler hold the same binding, so a tween that
/// has not started yet picks up a scale updated by a resize in between.
/// Single-threaded by design.
#[derive(Clone)]
pub struct ScaleBinding(Rc<Cell<f64>>);

impl ScaleBinding {
    pub fn new(value: f64) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> f64 {
        self.0.get()
    }

    pub fn set(&self, value: f64) {
        self.0.set(value);
    }
}

impl std::fmt::Debug for ScaleBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ScaleBinding").field(&self.get()).finish()
    }
}

#[derive(Clone, Debug)]
pub enum ScaleTarget {
    Value(f64),
    Binding(ScaleBinding),
}

/// What a tween animates. Start values left as `None` are captured from the
/// stage when the tween starts (GSAP-style `to` semantics).
#[derive(Clone, Debug)]
pub enum TweenProp {
    TranslateY { from: Len, to: Len },
    Scale { from: Option<f64>, to: ScaleTarget },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenEventKind {
    Started,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenEvent {
    pub id: TweenId,
    pub kind: TweenEventKind,
}

#[derive(Clone, Copy, Debug)]
enum Channel {
    TranslateY,
    Scale,
}

#[derive(Clone, Debug)]
struct Resolved {
    channel: Channel,
    from: Vec<f64>, // one start value per target
    to: f64,
}

#[derive(Clone, Debug)]
struct Tween {
    id: TweenId,
    targets: Vec<NodeId>,
    prop: TweenProp,
    spec: TweenSpec,
    elapsed: f64,
    resolved: Option<Resolved>,
    done: bool,
}

impl Tween {
    /// Active span covering the last staggered element, delay excluded.
    fn total_active(&self) -> f64 {
        let n = self.targets.len().max(1);
        self.spec.duration + self.spec.stagger * (n - 1) as f64
    }

    fn progress(&self) -> f64 {
        let active = (self.elapsed - self.spec.delay).max(0.0);
        let total = self.total_active();
        if total <= 0.0 {
            1.0
        } else {
            (active / total).clamp(0.0, 1.0)
        }
    }
}

/// Owns every live tween and advances them on an explicit virtual clock.
///
/// Callers drive it with [`tick`](Timeline::tick); each tick writes eased
/// values to the stage and reports started/completed transitions in delivery
/// order. A killed tween is detached immediately: it never writes or reports
/// again.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    tweens: Vec<Tween>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_to(&mut self, targets: Vec<NodeId>, prop: TweenProp, spec: TweenSpec) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            targets,
            prop,
            spec,
            elapsed: 0.0,
            resolved: None,
            done: false,
        });
        id
    }

    /// Normalized progress in [0,1] over the active span; 0 while delayed.
    pub fn progress(&self, id: TweenId) -> f64 {
        self.tweens
            .iter()
            .find(|t| t.id == id)
            .map(Tween::progress)
            .unwrap_or(0.0)
    }

    /// Stop and detach. No further writes or events from this tween.
    pub fn kill(&mut self, id: TweenId) {
        self.tweens.retain(|t| t.id != id);
    }

    /// Jump to elapsed time `secs` within the active span, skipping any
    /// remaining delay. Values are written on the next tick.
    pub fn seek(&mut self, id: TweenId, secs: f64) {
        if let Some(t) = self.tweens.iter_mut().find(|t| t.id == id) {
            t.elapsed = t.spec.delay + secs.max(0.0);
        }
    }

    pub fn is_live(&self, id: TweenId) -> bool {
        self.tweens.iter().any(|t| t.id == id && !t.done)
    }

    /// Advance every tween by `dt` seconds and write the resulting values.
    pub fn tick(&mut self, dt: f64, stage: &mut dyn Stage) -> Vec<TweenEvent> {
        let mut events = Vec::new();

        for tw in &mut self.tweens {
            if tw.done {
                continue;
            }
            tw.elapsed += dt;

            if tw.resolved.is_none() {
                if tw.elapsed + 1e-9 < tw.spec.delay {
                    continue;
                }
                tw.resolved = Some(resolve(&tw.prop, &tw.targets, &*stage));
                events.push(TweenEvent {
                    id: tw.id,
                    kind: TweenEventKind::Started,
                });
            }

            let Some(resolved) = tw.resolved.as_ref() else {
                continue;
            };
            for (i, &node) in tw.targets.iter().enumerate() {
                let local = tw.elapsed - tw.spec.delay - i as f64 * tw.spec.stagger;
                let t = norm(local, tw.spec.duration);
                let value = lerp(resolved.from[i], resolved.to, tw.spec.ease.apply(t));
                match resolved.channel {
                    Channel::TranslateY => stage.set_translate_y_px(node, value),
                    Channel::Scale => stage.set_scale(node, value),
                }
            }

            if tw.elapsed + 1e-9 >= tw.spec.delay + tw.total_active() {
                tw.done = true;
                events.push(TweenEvent {
                    id: tw.id,
                    kind: TweenEventKind::Completed,
                });
            }
        }

        events
    }
}

fn norm(local: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        (local / duration).clamp(0.0, 1.0)
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn resolve(prop: &TweenProp, targets: &[NodeId], stage: &dyn Stage) -> Resolved {
    match prop {
        TweenProp::TranslateY { from, to } => {
            let viewport = stage.viewport();
            Resolved {
                channel: Channel::TranslateY,
                from: vec![from.resolve(viewport); targets.len()],
                to: to.resolve(viewport),
            }
        }
        TweenProp::Scale { from, to } => Resolved {
            channel: Channel::Scale,
            from: targets
                .iter()
                .map(|&n| from.unwrap_or_else(|| stage.scale_of(n)))
                .collect(),
            to: match to {
                ScaleTarget::Value(v) => *v,
                ScaleTarget::Binding(b) => b.get(),
            },
        },
    }
}
