/// Rate limiting for bursty events such as window resizes
///
/// Timestamps are caller-supplied seconds from any monotonic reference;
/// nothing here reads a clock, so the same type works in the terminal
/// loop and in wasm where the host page supplies the time.
#[derive(Debug, Clone)]
pub struct EventThrottle<T> {
    pub interval: f64,
    last_fired: Option<f64>,
    pending: Option<T>,
}

impl<T> EventThrottle<T> {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_fired: None,
            pending: None,
        }
    }

    /// Offer an event at time `now`.
    ///
    /// Returns the event immediately when the interval has elapsed since
    /// the last delivery. Otherwise holds it, replacing any event already
    /// held, until `poll` releases it; only the newest event in a burst
    /// survives.
    pub fn offer(&mut self, value: T, now: f64) -> Option<T> {
        let ready = match self.last_fired {
            Some(last) => now - last >= self.interval,
            None => true,
        };
        if ready {
            self.last_fired = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the held event once the interval has elapsed
    pub fn poll(&mut self, now: f64) -> Option<T> {
        if self.pending.is_none() {
            return None;
        }
        match self.last_fired {
            Some(last) if now - last < self.interval => None,
            _ => {
                self.last_fired = Some(now);
                self.pending.take()
            }
        }
    }
}
