//! Bookkeeping for browser timers that must be replaced or cancelled.

/// Holds at most one pending timer handle.
///
/// Arming a new timer hands back the previous handle so the caller can clear
/// it; debounced callbacks therefore never stack.
#[derive(Debug, Default)]
pub struct TimerSlot<H> {
    pending: Option<H>,
}

impl<H> TimerSlot<H> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    #[must_use = "the replaced timer must be cleared"]
    pub fn arm(&mut self, handle: H) -> Option<H> {
        self.pending.replace(handle)
    }

    /// The timer fired; forget it without clearing.
    pub fn fired(&mut self) {
        self.pending = None;
    }

    #[must_use = "the disarmed timer must be cleared"]
    pub fn disarm(&mut self) -> Option<H> {
        self.pending.take()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}

/// Every timer started for one purpose (a stage choreography, the preloader),
/// so all of them can be cleared together on teardown.
#[derive(Debug, Default)]
pub struct TimerSet<H> {
    handles: Vec<H>,
}

impl<H: PartialEq> TimerSet<H> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn insert(&mut self, handle: H) {
        self.handles.push(handle);
    }

    pub fn remove(&mut self, handle: &H) {
        self.handles.retain(|h| h != handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Empties the set, returning every handle still pending.
    pub fn drain(&mut self) -> Vec<H> {
        std::mem::take(&mut self.handles)
    }
}
