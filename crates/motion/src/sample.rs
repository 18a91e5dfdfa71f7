use std::sync::{Arc, Mutex};

/// Single-slot, last-writer-wins cell for asynchronously produced samples.
///
/// Sensor callbacks replace the stored value; the tick-driven reader always
/// sees whatever was freshest at read time. There is deliberately no queue:
/// intermediate samples carry no information once a newer one exists.
#[derive(Debug)]
pub struct LatestSample<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T: Copy> LatestSample<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the stored sample.
    pub fn publish(&self, value: T) {
        *self.slot.lock().expect("sample slot poisoned") = Some(value);
    }

    /// Reads the freshest sample without consuming it.
    pub fn latest(&self) -> Option<T> {
        *self.slot.lock().expect("sample slot poisoned")
    }
}

impl<T: Copy> Default for LatestSample<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for LatestSample<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn later_writes_win() {
        let cell = LatestSample::new();
        assert_eq!(cell.latest(), None);
        cell.publish(1);
        cell.publish(2);
        cell.publish(3);
        assert_eq!(cell.latest(), Some(3));
        // Reading does not consume.
        assert_eq!(cell.latest(), Some(3));
    }

    #[test]
    fn clones_share_the_slot() {
        let cell = LatestSample::new();
        let writer = cell.clone();
        let handle = thread::spawn(move || writer.publish(42));
        handle.join().expect("writer thread");
        assert_eq!(cell.latest(), Some(42));
    }
}
