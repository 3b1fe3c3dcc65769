//! Background jobs
//!
//! Jobs are tokio tasks that never touch editor state. They report back
//! over a channel as [`JobMessage`]s, which the editor drains on its own
//! task and applies.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::buffer::BufferId;
use crate::lsp::{DiagnosticReport, LspClient};

pub mod jobs;

pub type JobId = usize;

pub type JobSender = UnboundedSender<JobMessage>;

/// Message sent from a background job to the editor.
pub enum JobMessage {
    /// Job started with ID and silent flag
    Started(JobId, bool),
    /// Job finished successfully with ID and silent flag
    Finished(JobId, bool),
    /// Job failed with error message
    Error(JobId, String),
    /// Job cancelled (terminal state)
    Cancelled(JobId),
    /// A language server is ready for the buffer
    LspAttached { buffer: BufferId, client: LspClient },
    /// The buffer goes without language features. `reason` is `None` when
    /// no server is configured for it.
    LspUnavailable {
        buffer: BufferId,
        reason: Option<String>,
    },
    /// Latest diagnostics for the buffer, replacing any earlier ones
    Diagnostics {
        buffer: BufferId,
        reports: Vec<DiagnosticReport>,
    },
}

impl fmt::Debug for JobMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started(id, silent) => write!(f, "Started({id}, {silent})"),
            Self::Finished(id, silent) => write!(f, "Finished({id}, {silent})"),
            Self::Error(id, msg) => write!(f, "Error({id}, {msg:?})"),
            Self::Cancelled(id) => write!(f, "Cancelled({id})"),
            Self::LspAttached { buffer, client } => {
                write!(f, "LspAttached {{ buffer: {buffer}, server: {} }}", client.server())
            }
            Self::LspUnavailable { buffer, reason } => {
                write!(f, "LspUnavailable {{ buffer: {buffer}, reason: {reason:?} }}")
            }
            Self::Diagnostics { buffer, reports } => {
                write!(f, "Diagnostics {{ buffer: {buffer}, reports: {} }}", reports.len())
            }
        }
    }
}

/// State of a background job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Finished,
    Failed,
    Cancelled,
}

/// Handle to a running job
struct JobHandle {
    handle: JoinHandle<()>,
    state: JobState,
    cancel: CancellationToken,
}

/// A background job.
///
/// # Invariants
/// * The job MUST NOT access editor state; everything it learns goes
///   through `sender`.
/// * The job reports its own `Finished` or `Error`. Cancellation is
///   reported by the manager.
#[async_trait]
pub trait Job: Send + fmt::Debug + 'static {
    async fn run(self: Box<Self>, id: JobId, sender: JobSender, cancel: CancellationToken);

    /// Whether this job should trigger notifications in the editor.
    fn is_silent(&self) -> bool {
        false
    }
}

/// Spawns jobs and collects their messages
pub struct JobManager {
    sender: JobSender,
    receiver: UnboundedReceiver<JobMessage>,
    jobs: HashMap<JobId, JobHandle>,
    next_job_id: JobId,
}

impl JobManager {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            jobs: HashMap::new(),
            next_job_id: 1,
        }
    }

    /// Spawn a job on the current runtime. Returns the job id.
    pub fn spawn<J: Job>(&mut self, job: J) -> JobId {
        self.spawn_with_cancel(job, CancellationToken::new())
    }

    /// Spawn a job that stops when `cancel` fires
    pub fn spawn_with_cancel<J: Job>(&mut self, job: J, cancel: CancellationToken) -> JobId {
        let id = self.next_job_id;
        self.next_job_id += 1;

        let sender = self.sender.clone();
        let silent = job.is_silent();
        let job: Box<J> = Box::new(job);
        let token = cancel.clone();
        tracing::debug!(job = id, ?job, "spawning job");

        let handle = tokio::spawn(async move {
            if sender.send(JobMessage::Started(id, silent)).is_err() {
                return;
            }
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    let _ = sender.send(JobMessage::Cancelled(id));
                }
                () = job.run(id, sender.clone(), token.clone()) => {}
            }
        });

        self.jobs.insert(
            id,
            JobHandle {
                handle,
                state: JobState::Running,
                cancel,
            },
        );
        id
    }

    /// Next message without waiting
    pub fn try_recv(&mut self) -> Option<JobMessage> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next message. The manager holds a sender itself, so
    /// this only returns `None` after the manager is dropped.
    pub async fn recv(&mut self) -> Option<JobMessage> {
        self.receiver.recv().await
    }

    /// Update job state based on message.
    /// This should be called by the editor when it processes a message.
    pub fn update_job_state(&mut self, message: &JobMessage) {
        let (id, state) = match message {
            JobMessage::Finished(id, _) => (id, JobState::Finished),
            JobMessage::Error(id, _) => (id, JobState::Failed),
            JobMessage::Cancelled(id) => (id, JobState::Cancelled),
            _ => return,
        };
        if let Some(job) = self.jobs.get_mut(id) {
            job.state = state;
        }
    }

    pub fn state(&self, id: JobId) -> Option<JobState> {
        self.jobs.get(&id).map(|job| job.state)
    }

    pub fn running_count(&self) -> usize {
        self.jobs
            .values()
            .filter(|job| job.state == JobState::Running)
            .count()
    }

    /// Forget jobs that reached a terminal state and whose task is done.
    /// Returns the removed ids.
    pub fn cleanup_finished_jobs(&mut self) -> Vec<JobId> {
        let finished: Vec<JobId> = self
            .jobs
            .iter()
            .filter(|(_, job)| job.state != JobState::Running && job.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();
        for id in &finished {
            self.jobs.remove(id);
        }
        finished
    }

    /// Cancel a specific job. The task observes the token and reports
    /// `Cancelled`.
    pub fn cancel_job(&mut self, id: JobId) {
        if let Some(job) = self.jobs.get_mut(&id) {
            job.cancel.cancel();
            job.state = JobState::Cancelled;
        }
    }

    pub fn cancel_all(&mut self) {
        for job in self.jobs.values_mut() {
            job.cancel.cancel();
            if job.state == JobState::Running {
                job.state = JobState::Cancelled;
            }
        }
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for JobManager {
    fn drop(&mut self) {
        for job in self.jobs.values() {
            job.cancel.cancel();
        }
    }
}
