use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

// ---------------------------------------------------------------------------
// Fetch slot: one background-loaded piece of state
// ---------------------------------------------------------------------------

/// Lifecycle of a background-loaded value.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> FetchState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

type Outcome<T> = (u64, Result<T, String>);

/// A result slot filled by background jobs.
///
/// Every [`start`](Self::start) bumps the slot's generation; [`poll`](Self::poll)
/// only applies results carrying the current generation, so a job that was
/// superseded before it finished can never overwrite newer state.
pub struct FetchSlot<T> {
    label: &'static str,
    generation: u64,
    state: FetchState<T>,
    tx: Sender<Outcome<T>>,
    rx: Receiver<Outcome<T>>,
}

impl<T: Send + 'static> FetchSlot<T> {
    pub fn new(label: &'static str) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            label,
            generation: 0,
            state: FetchState::Idle,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `job` on a background thread and mark the slot as loading.
    pub fn start<F>(&mut self, job: F) -> JoinHandle<()>
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        self.generation += 1;
        self.state = FetchState::Loading;
        let generation = self.generation;
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = job().map_err(|e| format!("{e:#}"));
            // The slot may have been dropped with the app; nothing to report to.
            let _ = tx.send((generation, result));
        })
    }

    /// Apply finished jobs. Returns `true` when the visible state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, result)) = self.rx.try_recv() {
            if generation != self.generation {
                log::warn!(
                    "{}: dropping stale result (generation {generation}, current {})",
                    self.label,
                    self.generation
                );
                continue;
            }
            self.state = match result {
                Ok(value) => {
                    log::info!("{}: loaded", self.label);
                    FetchState::Ready(value)
                }
                Err(msg) => {
                    log::error!("{}: fetch failed: {msg}", self.label);
                    FetchState::Failed(msg)
                }
            };
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn successful_job_becomes_ready() {
        let mut slot = FetchSlot::new("test");
        assert_eq!(slot.state(), &FetchState::Idle);
        let handle = slot.start(|| Ok(42));
        assert!(slot.state().is_loading());
        handle.join().unwrap();
        assert!(slot.poll());
        assert_eq!(slot.state(), &FetchState::Ready(42));
        assert!(!slot.poll());
    }

    #[test]
    fn failed_job_is_distinct_from_loading() {
        let mut slot: FetchSlot<u32> = FetchSlot::new("test");
        slot.start(|| Err(anyhow!("boom").context("fetching")))
            .join()
            .unwrap();
        slot.poll();
        assert_eq!(slot.state(), &FetchState::Failed("fetching: boom".to_string()));
    }

    #[test]
    fn late_result_of_superseded_job_is_ignored() {
        let mut slot = FetchSlot::new("test");
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let slow = slot.start(move || {
            release_rx.recv().ok();
            Ok("old")
        });
        let fast = slot.start(|| Ok("new"));
        fast.join().unwrap();
        slot.poll();
        assert_eq!(slot.state(), &FetchState::Ready("new"));

        release_tx.send(()).unwrap();
        slow.join().unwrap();
        assert!(!slot.poll());
        assert_eq!(slot.state(), &FetchState::Ready("new"));
        assert_eq!(slot.generation(), 2);
    }
}
