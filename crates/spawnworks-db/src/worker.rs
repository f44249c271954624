//! Asynchronous save worker.
//!
//! Callers hand save and delete jobs to a bounded queue and return
//! immediately; a small pool of threads drains the queue into the store.
//! Submission never blocks: a full queue drops the job with a warning, on
//! the grounds that a later save of the same record supersedes it and a
//! final flush happens at shutdown.

use crate::error::{Error, Result};
use crate::store::Store;
use spawnworks_core::{PlayerLimitData, SpawnerRecord};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One unit of persistence work.
enum PersistJob {
    SaveSpawner(Box<SpawnerRecord>),
    DeleteSpawner(u64),
    SavePlayer(Box<PlayerLimitData>),
    Shutdown,
}

/// Tuning for the save worker pool.
#[derive(Debug, Clone)]
pub struct SaveWorkerConfig {
    /// Bounded queue depth; submissions beyond it are dropped.
    pub queue_depth: usize,
    /// Worker thread count; 0 means one per logical CPU.
    pub workers: usize,
    /// Attempts per job before giving up.
    pub max_retries: u32,
    /// Linear backoff between attempts, in milliseconds.
    pub retry_backoff_ms: u64,
    /// Jobs slower than this are logged, in milliseconds.
    pub job_budget_ms: u64,
}

impl Default for SaveWorkerConfig {
    fn default() -> Self {
        Self {
            queue_depth: 1000,
            workers: 0,
            max_retries: 3,
            retry_backoff_ms: 1000,
            job_budget_ms: 250,
        }
    }
}

impl SaveWorkerConfig {
    fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

/// Thread pool writing records to the store off the caller's thread.
pub struct SaveWorker {
    tx: SyncSender<PersistJob>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    workers: usize,
}

impl SaveWorker {
    /// Spawn the pool over a shared store.
    pub fn spawn(store: Arc<Store>, config: SaveWorkerConfig) -> Self {
        let workers = config.worker_count();
        let (tx, rx) = mpsc::sync_channel::<PersistJob>(config.queue_depth.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(workers);
        for n in 0..workers {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&store);
            let config = config.clone();
            let handle = thread::Builder::new()
                .name(format!("spawnworks-save-{n}"))
                .spawn(move || run_worker(&rx, &store, &config))
                .unwrap_or_else(|e| panic!("failed to spawn save worker: {e}"));
            handles.push(handle);
        }

        Self {
            tx,
            handles: Mutex::new(handles),
            workers,
        }
    }

    /// Queue a spawner save.
    pub fn submit_save(&self, record: &SpawnerRecord) -> Result<()> {
        self.submit(PersistJob::SaveSpawner(Box::new(record.clone())))
    }

    /// Queue a spawner delete.
    pub fn submit_delete(&self, id: u64) -> Result<()> {
        self.submit(PersistJob::DeleteSpawner(id))
    }

    /// Queue a player-data save.
    pub fn submit_player(&self, data: &PlayerLimitData) -> Result<()> {
        self.submit(PersistJob::SavePlayer(Box::new(data.clone())))
    }

    /// Drain queued jobs and stop the pool.
    ///
    /// Every job submitted before this call is processed; the sentinel sits
    /// behind them in the queue.
    pub fn shutdown(&self) {
        for _ in 0..self.workers {
            // A disconnected queue means the workers are already gone.
            let _ = self.tx.send(PersistJob::Shutdown);
        }
        let handles = std::mem::take(
            &mut *self
                .handles
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for handle in handles {
            let _ = handle.join();
        }
    }

    fn submit(&self, job: PersistJob) -> Result<()> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(Error::QueueFull),
            Err(TrySendError::Disconnected(_)) => {
                Err(Error::Database("save workers stopped".to_string()))
            }
        }
    }
}

/// The engine persists through this worker; failures are logged, never
/// surfaced into the tick path.
impl spawnworks_engine::Persistence for SaveWorker {
    fn save_record(&self, record: &SpawnerRecord) {
        if let Err(e) = self.submit_save(record) {
            log::warn!("dropping save for spawner #{}: {e}", record.id);
        }
    }

    fn delete_record(&self, id: u64) {
        if let Err(e) = self.submit_delete(id) {
            log::warn!("dropping delete for spawner #{id}: {e}");
        }
    }

    fn save_player(&self, data: &PlayerLimitData) {
        if let Err(e) = self.submit_player(data) {
            log::warn!("dropping save for player {}: {e}", data.owner);
        }
    }
}

fn run_worker(rx: &Mutex<Receiver<PersistJob>>, store: &Store, config: &SaveWorkerConfig) {
    loop {
        let job = {
            let rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
            rx.recv()
        };
        let job = match job {
            Ok(PersistJob::Shutdown) | Err(_) => return,
            Ok(job) => job,
        };

        let started = Instant::now();
        process_with_retries(store, &job, config);
        let elapsed = started.elapsed();
        if elapsed > Duration::from_millis(config.job_budget_ms) {
            log::warn!("slow persistence job: {} ms", elapsed.as_millis());
        }
    }
}

fn process_with_retries(store: &Store, job: &PersistJob, config: &SaveWorkerConfig) {
    let attempts = config.max_retries.max(1);
    for attempt in 1..=attempts {
        match process(store, job) {
            Ok(()) => return,
            Err(e) if attempt < attempts => {
                log::warn!("persistence attempt {attempt} failed, retrying: {e}");
                thread::sleep(Duration::from_millis(
                    config.retry_backoff_ms * u64::from(attempt),
                ));
            }
            Err(e) => {
                log::error!("persistence job failed after {attempts} attempts: {e}");
            }
        }
    }
}

fn process(store: &Store, job: &PersistJob) -> Result<()> {
    match job {
        PersistJob::SaveSpawner(record) => store.save_spawner(record),
        PersistJob::DeleteSpawner(id) => store.delete_spawner(*id),
        PersistJob::SavePlayer(data) => store.save_player(data),
        PersistJob::Shutdown => Ok(()),
    }
}
