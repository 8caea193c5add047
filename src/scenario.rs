use kurbo::Size;

use crate::error::{GridstageError, GridstageResult};
use crate::sequencer::{ScalePhase, Sequencer};
use crate::stage::{MemoryStage, Stage};

/// A headless run description: stage geometry plus timed viewport resizes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub viewport: Size,
    pub content: Size,
    #[serde(default = "default_items")]
    pub items_per_column: usize,
    #[serde(default)]
    pub resizes: Vec<ResizeEvent>,
    /// Total simulated time in seconds.
    pub duration: f64,
    #[serde(default = "default_step")]
    pub step: f64,
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct ResizeEvent {
    pub at: f64,
    pub viewport: Size,
}

fn default_items() -> usize {
    5
}

fn default_step() -> f64 {
    1.0 / 60.0
}

impl Scenario {
    pub fn from_json(json: &str) -> GridstageResult<Self> {
        serde_json::from_str(json).map_err(|e| GridstageError::serde(e.to_string()))
    }

    pub fn validate(&self) -> GridstageResult<()> {
        if self.duration <= 0.0 {
            return Err(GridstageError::validation("duration must be > 0"));
        }
        if self.step <= 0.0 {
            return Err(GridstageError::validation("step must be > 0"));
        }
        if !self.resizes.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(GridstageError::validation(
                "resize events must be sorted by time",
            ));
        }
        Ok(())
    }
}

/// One sampled frame of a simulation run.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct TraceSample {
    pub t: f64,
    pub grid_scale: f64,
    pub content_scale: f64,
    pub content_size: Option<Size>,
    pub phase: ScalePhase,
}

/// Run the full entry sequence over a virtual clock, delivering the
/// scenario's resize events as they come due, and sample the stage once per
/// step.
pub fn simulate(scenario: &Scenario) -> GridstageResult<Vec<TraceSample>> {
    scenario.validate()?;

    let stage = MemoryStage::grid(
        scenario.viewport,
        scenario.content,
        scenario.items_per_column,
    );
    let mut seq = Sequencer::new(stage)?;
    seq.start();

    let grid = seq.grid();
    let mut samples = Vec::new();
    let mut resizes = scenario.resizes.iter().peekable();

    let steps = (scenario.duration / scenario.step).ceil() as u64;
    for i in 0..=steps {
        let t = i as f64 * scenario.step;
        while let Some(ev) = resizes.peek() {
            if ev.at > t {
                break;
            }
            seq.stage_mut().set_viewport(ev.viewport);
            seq.notify_resize(t);
            resizes.next();
        }

        seq.tick(t, scenario.step);

        let content = seq.stage().query(".content");
        samples.push(TraceSample {
            t,
            grid_scale: seq.stage().scale_of(grid),
            content_scale: seq.layout().content_scale,
            content_size: content.and_then(|n| seq.stage().size_of(n)),
            phase: seq.phase(),
        });
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Scenario {
        Scenario {
            viewport: Size::new(800.0, 300.0),
            content: Size::new(400.0, 300.0),
            items_per_column: 3,
            resizes: vec![],
            duration: 7.0,
            step: 0.05,
        }
    }

    #[test]
    fn quiet_run_finishes_at_the_cover_scale() {
        let samples = simulate(&scenario()).unwrap();
        let last = samples.last().unwrap();
        assert_eq!(last.phase, ScalePhase::Complete);
        assert_eq!(last.grid_scale, 2.0);
        assert_eq!(last.content_size, Some(Size::new(400.0, 150.0)));
    }

    #[test]
    fn resize_mid_flight_lands_on_the_new_scale() {
        let mut sc = scenario();
        sc.resizes = vec![ResizeEvent {
            at: 3.0,
            viewport: Size::new(1200.0, 300.0),
        }];
        let samples = simulate(&sc).unwrap();
        let last = samples.last().unwrap();
        assert_eq!(last.phase, ScalePhase::Complete);
        assert_eq!(last.grid_scale, 3.0);
        assert_eq!(last.content_size, Some(Size::new(400.0, 100.0)));
    }

    #[test]
    fn validation_catches_bad_scenarios() {
        let mut sc = scenario();
        sc.duration = 0.0;
        assert!(sc.validate().is_err());

        let mut sc = scenario();
        sc.step = -1.0;
        assert!(sc.validate().is_err());

        let mut sc = scenario();
        sc.resizes = vec![
            ResizeEvent {
                at: 2.0,
                viewport: Size::new(1.0, 1.0),
            },
            ResizeEvent {
                at: 1.0,
                viewport: Size::new(1.0, 1.0),
            },
        ];
        assert!(sc.validate().is_err());
    }

    #[test]
    fn from_json_reports_serde_errors() {
        assert!(matches!(
            Scenario::from_json("{"),
            Err(GridstageError::Serde(_))
        ));
    }
}
