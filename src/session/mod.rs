//! Single-flight study session.
//!
//! A [`StudySession`] owns a pipeline and the one slot holding the most
//! recently generated [`LearningMaterial`]. Every call to
//! [`StudySession::generate`] starts a new run and supersedes any run still
//! in flight: the older run's progress events stop reaching its reporter and
//! its result is never stored. A failed run leaves the slot untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::StudyConfig;
use crate::embedding::TopicEmbedder;
use crate::generation::ContentGenerator;
use crate::models::LearningMaterial;
use crate::pipeline::{
    validate_topic, LearningPipeline, PipelineComponents, PipelineError, PipelineProgress, ProgressReporter,
    TemplatePipeline,
};
use crate::retrieval::Retriever;

/// Errors that can occur while generating material in a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Topic rejected before the pipeline ran
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    /// A newer run started before this one finished
    #[error("Generation for '{topic}' was superseded by a newer request")]
    Superseded { topic: String },

    /// The pipeline itself failed
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Material stored in the session slot, with the topic it was made for.
#[derive(Debug, Clone)]
struct Stored {
    topic: String,
    material: Arc<LearningMaterial>,
}

/// Reporter that forwards events only while its run is still the latest.
struct EpochReporter<'a, P: ?Sized> {
    epoch: u64,
    latest: &'a AtomicU64,
    inner: &'a P,
}

impl<P> ProgressReporter for EpochReporter<'_, P>
where
    P: ProgressReporter + ?Sized,
{
    fn report(&self, progress: &PipelineProgress) {
        if self.latest.load(Ordering::SeqCst) == self.epoch {
            self.inner.report(progress);
        }
    }
}

/// Session holding at most one generated result.
pub struct StudySession<E, R, G>
where
    E: TopicEmbedder,
    R: Retriever,
    G: ContentGenerator,
{
    pipeline: LearningPipeline<E, R, G>,

    /// Most recent successful result
    slot: Mutex<Option<Stored>>,

    /// Epoch of the latest run started
    latest: AtomicU64,
}

/// Session over the template pipeline.
pub type TemplateSession = StudySession<
    crate::embedding::pseudo::PseudoEmbedder,
    crate::retrieval::TemplateRetriever,
    crate::generation::TemplateGenerator,
>;

impl TemplateSession {
    pub fn from_config(config: &StudyConfig) -> Self {
        StudySession::new(TemplatePipeline::from_config(config))
    }
}

impl<E, R, G> StudySession<E, R, G>
where
    E: TopicEmbedder,
    R: Retriever,
    G: ContentGenerator,
{
    pub fn new(pipeline: LearningPipeline<E, R, G>) -> Self {
        Self {
            pipeline,
            slot: Mutex::new(None),
            latest: AtomicU64::new(0),
        }
    }

    /// Generate material for `topic` and store it in the session.
    ///
    /// # Arguments
    /// * `topic` - Topic to study; validated before anything runs
    /// * `progress` - Receives progress for as long as this run is the latest
    ///
    /// # Returns
    /// The stored material
    ///
    /// # Errors
    /// - `InvalidTopic` if the topic fails validation
    /// - `Superseded` if another run started before this one finished
    /// - `Pipeline` if a stage failed; the previous result is kept
    pub async fn generate<P>(&self, topic: &str, progress: &P) -> SessionResult<Arc<LearningMaterial>>
    where
        P: ProgressReporter + ?Sized,
    {
        let validation = validate_topic(topic);
        if !validation.valid {
            return Err(SessionError::InvalidTopic(validation.message.unwrap_or_default()));
        }

        let epoch = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let reporter = EpochReporter {
            epoch,
            latest: &self.latest,
            inner: progress,
        };

        let outcome = self.pipeline.run_with_progress(topic, &reporter).await;

        // Checked under the slot lock so a newer run always stores last.
        let mut slot = self.slot.lock().await;
        if self.latest.load(Ordering::SeqCst) != epoch {
            warn!(topic, epoch, "Discarding result of superseded run");
            return Err(SessionError::Superseded {
                topic: topic.to_string(),
            });
        }

        let material = Arc::new(outcome?);
        *slot = Some(Stored {
            topic: topic.to_string(),
            material: material.clone(),
        });
        info!(topic, epoch, "Stored learning material");

        Ok(material)
    }

    /// Describe the services behind this session's pipeline.
    pub fn describe(&self) -> PipelineComponents {
        self.pipeline.describe()
    }

    /// The stored material, if any run has succeeded.
    pub async fn current(&self) -> Option<Arc<LearningMaterial>> {
        self.slot.lock().await.as_ref().map(|s| s.material.clone())
    }

    /// The topic of the stored material.
    pub async fn topic(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|s| s.topic.clone())
    }

    /// Empty the slot.
    pub async fn clear(&self) {
        *self.slot.lock().await = None;
    }
}
