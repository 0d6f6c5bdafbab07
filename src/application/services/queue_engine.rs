use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify, watch};

use crate::application::ports::{
    CredentialProvider, JobRepository, NoteRepository, NoteTransformer, RepositoryError,
    SourceRepository, TransformerError,
};
use crate::domain::{Job, JobId, JobStatus, Note, SourceFile, SourceId, Stage};

/// A file accepted for processing. The caller has already filtered out
/// unsupported document types.
#[derive(Debug, Clone)]
pub struct SubmittedFile {
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Read-only mirror of a job record, hydrated with the display name of
/// its source file. All mutation flows through the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct JobView {
    pub id: JobId,
    pub source_id: SourceId,
    pub file_name: String,
    pub status: JobStatus,
    pub stage: Stage,
    pub error: Option<String>,
}

impl JobView {
    fn from_job(job: Job, file_name: String) -> Self {
        Self {
            id: job.id,
            source_id: job.source_id,
            file_name,
            status: job.status,
            stage: job.stage,
            error: job.error_message,
        }
    }
}

/// Point-in-time snapshot of the queue published to callers.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub jobs: Vec<JobView>,
    pub running: bool,
    pub active: bool,
    pub cooldown_remaining: u32,
}

/// Cooldown durations sit between pipeline stages and between jobs to
/// respect the transformation service's call-rate limits. The exact
/// upstream limit is unknown, so these are plain configuration.
#[derive(Debug, Clone)]
pub struct CooldownConfig {
    /// Units waited between stage 1/2 and stage 2/3.
    pub stage_cooldown: u32,
    /// Units waited after a completed job before the next one starts.
    pub job_cooldown: u32,
    /// Wall-clock length of one cooldown unit.
    pub tick: Duration,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            stage_cooldown: 10,
            job_cooldown: 30,
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("source file not found: {0}")]
    MissingSource(SourceId),
    #[error("no API key configured")]
    MissingApiKey,
    #[error("unknown job: {0}")]
    UnknownJob(JobId),
    #[error("transformation failed: {0}")]
    Transform(#[from] TransformerError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

/// Single-consumer job queue driving each submitted document through the
/// three transformation stages, one job at a time.
///
/// The engine is an explicit loop: [`run`](Self::run) waits on a wakeup
/// signal and, while `active`, pulls the oldest pending job and drives it
/// to a terminal state. The durable store is the source of truth; the
/// in-memory view is rebuilt from it by [`restore`](Self::restore) and
/// updated in lockstep with every persisted transition.
pub struct QueueEngine {
    sources: Arc<dyn SourceRepository>,
    job_repository: Arc<dyn JobRepository>,
    notes: Arc<dyn NoteRepository>,
    transformer: Arc<dyn NoteTransformer>,
    credentials: Arc<dyn CredentialProvider>,
    cooldowns: CooldownConfig,
    jobs: Mutex<Vec<JobView>>,
    active: AtomicBool,
    running: AtomicBool,
    cooldown_tx: watch::Sender<u32>,
    cooldown_rx: watch::Receiver<u32>,
    wake: Notify,
}

impl QueueEngine {
    pub fn new(
        sources: Arc<dyn SourceRepository>,
        job_repository: Arc<dyn JobRepository>,
        notes: Arc<dyn NoteRepository>,
        transformer: Arc<dyn NoteTransformer>,
        credentials: Arc<dyn CredentialProvider>,
        cooldowns: CooldownConfig,
    ) -> Self {
        let (cooldown_tx, cooldown_rx) = watch::channel(0);
        Self {
            sources,
            job_repository,
            notes,
            transformer,
            credentials,
            cooldowns,
            jobs: Mutex::new(Vec::new()),
            active: AtomicBool::new(false),
            running: AtomicBool::new(false),
            cooldown_tx,
            cooldown_rx,
            wake: Notify::new(),
        }
    }

    /// Rebuilds the in-memory job view from the durable store. Any job
    /// found in PROCESSING was abandoned by a dead process mid-stage;
    /// stages are safe to re-run from scratch but not to resume, so the
    /// job is demoted to PENDING at stage 0.
    pub async fn restore(&self) -> Result<(), EngineError> {
        let records = self.job_repository.list_all().await?;
        let mut views = Vec::with_capacity(records.len());

        for mut job in records {
            if job.status == JobStatus::Processing {
                tracing::warn!(
                    job_id = %job.id,
                    stage = %job.stage,
                    "Job was left PROCESSING by a previous run, resetting to PENDING"
                );
                self.job_repository
                    .update_progress(job.id, JobStatus::Pending, Stage::NotStarted, None)
                    .await?;
                job.status = JobStatus::Pending;
                job.stage = Stage::NotStarted;
                job.error_message = None;
            }

            let file_name = self
                .sources
                .get(job.source_id)
                .await?
                .map(|s| s.filename)
                .unwrap_or_else(|| "unknown file".to_string());

            views.push(JobView::from_job(job, file_name));
        }

        tracing::info!(jobs = views.len(), "Queue restored from store");
        *self.jobs.lock().await = views;
        Ok(())
    }

    /// Persists a source and a pending job per file and appends them to
    /// the live view in submission order. Never waits on an in-flight
    /// job; files submitted mid-run are picked up later.
    pub async fn submit(&self, files: Vec<SubmittedFile>) -> Result<Vec<JobId>, EngineError> {
        let mut ids = Vec::with_capacity(files.len());

        for file in files {
            let source = SourceFile::new(file.filename, file.mime_type, file.data);
            self.sources.save(&source).await?;

            let job = Job::new(source.id);
            self.job_repository.create(&job).await?;

            tracing::info!(
                job_id = %job.id,
                source_id = %source.id,
                filename = %source.filename,
                "Job enqueued"
            );

            ids.push(job.id);
            let mut jobs = self.jobs.lock().await;
            jobs.push(JobView::from_job(job, source.filename));
        }

        self.wake.notify_one();
        Ok(ids)
    }

    /// Allows the engine to pull work. Idempotent.
    pub fn start(&self) {
        self.active.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Stops the engine from pulling the next job. The job currently in
    /// flight, if any, runs to its terminal state.
    pub fn pause(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Resets a job to PENDING at stage 0 and clears its error. Does not
    /// activate the engine.
    pub async fn retry(&self, id: JobId) -> Result<(), EngineError> {
        let known = self.jobs.lock().await.iter().any(|j| j.id == id);
        if !known {
            return Err(EngineError::UnknownJob(id));
        }
        self.update_job(id, JobStatus::Pending, Stage::NotStarted, None)
            .await?;
        tracing::info!(job_id = %id, "Job reset for retry");
        self.wake.notify_one();
        Ok(())
    }

    /// Deletes all COMPLETED and FAILED job records. Pending and
    /// processing jobs, sources, and notes are untouched.
    pub async fn purge_finished(&self) -> Result<(), EngineError> {
        let mut jobs = self.jobs.lock().await;
        let finished: Vec<JobId> = jobs
            .iter()
            .filter(|j| j.status.is_finished())
            .map(|j| j.id)
            .collect();

        for id in &finished {
            self.job_repository.delete(*id).await?;
        }
        jobs.retain(|j| !j.status.is_finished());

        tracing::info!(purged = finished.len(), "Finished jobs purged");
        Ok(())
    }

    pub async fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            jobs: self.jobs.lock().await.clone(),
            running: self.running.load(Ordering::SeqCst),
            active: self.active.load(Ordering::SeqCst),
            cooldown_remaining: *self.cooldown_rx.borrow(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn cooldown_remaining(&self) -> u32 {
        *self.cooldown_rx.borrow()
    }

    /// Countdown channel for callers rendering the cooldown badge. One
    /// value is published per elapsed unit, ending at 0.
    pub fn subscribe_cooldown(&self) -> watch::Receiver<u32> {
        self.cooldown_tx.subscribe()
    }

    /// Scheduling loop. Spawn once per engine instance; exits when the
    /// engine is dropped by the caller holding the `Arc`.
    pub async fn run(self: Arc<Self>) {
        tracing::info!("Queue engine started");
        loop {
            self.wake.notified().await;

            while self.active.load(Ordering::SeqCst) {
                let Some((job_id, source_id)) = self.next_pending().await else {
                    // Original behavior: the queue deactivates itself
                    // once drained and waits for an explicit start.
                    self.active.store(false, Ordering::SeqCst);
                    tracing::debug!("No pending jobs, engine idle");
                    break;
                };

                self.running.store(true, Ordering::SeqCst);
                match self.drive_job(job_id, source_id).await {
                    Ok(()) => {
                        // Gentler global rate limit between jobs.
                        self.cooldown(self.cooldowns.job_cooldown).await;
                    }
                    Err(e) => {
                        tracing::error!(job_id = %job_id, error = %e, "Job failed");
                        self.fail_job(job_id, &e.to_string()).await;
                    }
                }
                self.running.store(false, Ordering::SeqCst);
            }
        }
    }

    async fn next_pending(&self) -> Option<(JobId, SourceId)> {
        self.jobs
            .lock()
            .await
            .iter()
            .find(|j| j.status == JobStatus::Pending)
            .map(|j| (j.id, j.source_id))
    }

    async fn drive_job(&self, job_id: JobId, source_id: SourceId) -> Result<(), EngineError> {
        self.update_job(job_id, JobStatus::Processing, Stage::Structuring, None)
            .await?;

        let source = self
            .sources
            .get(source_id)
            .await?
            .ok_or(EngineError::MissingSource(source_id))?;
        let api_key = self
            .credentials
            .api_key()
            .ok_or(EngineError::MissingApiKey)?;

        tracing::info!(job_id = %job_id, filename = %source.filename, "Stage 1: structuring");
        let structured = self
            .transformer
            .structure(&api_key, &source.data, &source.mime_type)
            .await?;

        self.cooldown(self.cooldowns.stage_cooldown).await;
        self.update_job(job_id, JobStatus::Processing, Stage::Enriching, None)
            .await?;

        tracing::info!(job_id = %job_id, "Stage 2: enriching");
        let enriched = self
            .transformer
            .enrich(&api_key, &structured, &source.data, &source.mime_type)
            .await?;

        self.cooldown(self.cooldowns.stage_cooldown).await;
        self.update_job(job_id, JobStatus::Processing, Stage::Synthesizing, None)
            .await?;

        tracing::info!(job_id = %job_id, "Stage 3: synthesizing");
        let summary = self
            .transformer
            .synthesize(&api_key, &enriched, &source.data, &source.mime_type)
            .await?;

        // The visual summary reads as an overview, so it precedes the
        // detailed note in the final document.
        let note = Note::new(source_id, format!("{}\n\n{}", summary, enriched));
        self.notes.upsert(&note).await?;

        self.update_job(job_id, JobStatus::Completed, Stage::Synthesizing, None)
            .await?;
        tracing::info!(job_id = %job_id, "Job completed");
        Ok(())
    }

    /// Persists the transition first, then mirrors it, under one lock so
    /// no snapshot can observe a status without its matching stage.
    async fn update_job(
        &self,
        id: JobId,
        status: JobStatus,
        stage: Stage,
        error: Option<&str>,
    ) -> Result<(), EngineError> {
        let mut jobs = self.jobs.lock().await;
        self.job_repository
            .update_progress(id, status, stage, error)
            .await?;
        if let Some(view) = jobs.iter_mut().find(|j| j.id == id) {
            view.status = status;
            view.stage = stage;
            view.error = error.map(str::to_string);
        }
        Ok(())
    }

    /// Marks a job FAILED at whatever stage it last reached. The mirror
    /// is updated even when the store write fails, so a failed job never
    /// silently disappears from the live view.
    async fn fail_job(&self, id: JobId, message: &str) {
        let mut jobs = self.jobs.lock().await;
        let stage = jobs
            .iter()
            .find(|j| j.id == id)
            .map(|j| j.stage)
            .unwrap_or(Stage::NotStarted);

        if let Err(e) = self
            .job_repository
            .update_progress(id, JobStatus::Failed, stage, Some(message))
            .await
        {
            tracing::error!(job_id = %id, error = %e, "Could not persist FAILED status");
        }
        if let Some(view) = jobs.iter_mut().find(|j| j.id == id) {
            view.status = JobStatus::Failed;
            view.stage = stage;
            view.error = Some(message.to_string());
        }
    }

    /// Counts `units` down to 0, publishing each remaining value once
    /// per tick. The wait itself is not persisted: a crash here is
    /// handled the same way as a crash in the following stage.
    async fn cooldown(&self, units: u32) {
        for remaining in (1..=units).rev() {
            let _ = self.cooldown_tx.send(remaining);
            tokio::time::sleep(self.cooldowns.tick).await;
        }
        let _ = self.cooldown_tx.send(0);
    }
}
