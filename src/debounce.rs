/// Trailing-edge debouncer over a virtual clock.
///
/// Every [`trigger`](Debouncer::trigger) re-arms the deadline, so a burst of
/// triggers collapses to a single firing `delay` seconds after the last one.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay: f64) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debouncer at virtual time `now`.
    pub fn trigger(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns true exactly once per armed period, on the first poll at or
    /// after the deadline.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now + 1e-9 >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let mut d = Debouncer::new(0.1);
        d.trigger(0.0);
        assert!(!d.poll(0.05));
        assert!(d.poll(0.1));
        assert!(!d.poll(0.2));
    }

    #[test]
    fn burst_collapses_to_trailing_edge() {
        let mut d = Debouncer::new(0.1);
        let mut fired = 0;
        // Five triggers within 50ms of each other.
        for i in 0..5 {
            d.trigger(i as f64 * 0.01);
        }
        let mut t = 0.05;
        while t < 0.5 {
            if d.poll(t) {
                fired += 1;
                // ~100ms after the last trigger at t=0.04.
                assert!((t - 0.14).abs() < 0.011);
            }
            t += 0.01;
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn retrigger_resets_the_deadline() {
        let mut d = Debouncer::new(0.1);
        d.trigger(0.0);
        d.trigger(0.08);
        assert!(!d.poll(0.1));
        assert!(d.poll(0.18));
    }

    #[test]
    fn unarmed_never_fires() {
        let mut d = Debouncer::new(0.1);
        assert!(!d.is_armed());
        assert!(!d.poll(10.0));
    }
}
