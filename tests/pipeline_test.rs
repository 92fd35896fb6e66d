use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use skrivari::application::ports::{
    ContentStore, ContentStoreError, JobRepository, PollStatus, PostProcessError, ProviderError,
    RecordRevision, TranscriptEditor, TranscriptionProvider,
};
use skrivari::application::services::{
    poll_until_terminal, JobRunner, PollOutcome, PollPolicy, ResultPersister,
    TranscriptionPipeline,
};
use skrivari::domain::{AudioSource, Job, JobStatus, RecordId, RecordStatus, TranscriptId};
use skrivari::infrastructure::media::FfmpegTranscoder;
use skrivari::infrastructure::persistence::{MemoryContentStore, MemoryJobRepository};

struct ScriptedProvider {
    submit_error: Option<String>,
    responses: Mutex<VecDeque<PollStatus>>,
    polls: AtomicU32,
}

impl ScriptedProvider {
    fn new(responses: Vec<PollStatus>) -> Self {
        Self {
            submit_error: None,
            responses: Mutex::new(responses.into()),
            polls: AtomicU32::new(0),
        }
    }

    fn failing_submit(message: &str) -> Self {
        Self {
            submit_error: Some(message.to_string()),
            responses: Mutex::new(VecDeque::new()),
            polls: AtomicU32::new(0),
        }
    }

    fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionProvider for ScriptedProvider {
    async fn upload(&self, _data: Vec<u8>) -> Result<String, ProviderError> {
        Ok("https://cdn.example.com/uploaded-audio".to_string())
    }

    async fn submit(&self, _audio_url: &str) -> Result<TranscriptId, ProviderError> {
        if let Some(message) = &self.submit_error {
            return Err(ProviderError::SubmissionFailed {
                status: 400,
                body: message.clone(),
            });
        }
        Ok(TranscriptId::new("transcript-1"))
    }

    async fn poll(&self, _id: &TranscriptId) -> Result<PollStatus, ProviderError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| PollStatus::InProgress("processing".to_string())))
    }
}

enum EditorBehavior {
    Clean(String),
    Fail,
}

struct MockEditor {
    behavior: EditorBehavior,
    calls: AtomicU32,
}

impl MockEditor {
    fn cleaning(text: &str) -> Self {
        Self {
            behavior: EditorBehavior::Clean(text.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            behavior: EditorBehavior::Fail,
            calls: AtomicU32::new(0),
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptEditor for MockEditor {
    async fn clean(&self, _raw_text: &str) -> Result<String, PostProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            EditorBehavior::Clean(text) => Ok(text.clone()),
            EditorBehavior::Fail => Err(PostProcessError::Api {
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }
}

fn instant_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::ZERO,
        max_attempts,
    }
}

struct TestHarness {
    runner: JobRunner,
    store: Arc<MemoryContentStore>,
    repository: Arc<MemoryJobRepository>,
}

fn harness(provider: Arc<ScriptedProvider>, editor: Arc<MockEditor>) -> TestHarness {
    let store = Arc::new(MemoryContentStore::new());
    let repository = Arc::new(MemoryJobRepository::new());

    let pipeline = Arc::new(TranscriptionPipeline::new(
        Arc::new(FfmpegTranscoder::new()),
        provider,
        editor,
        instant_policy(50),
    ));
    let persister = Arc::new(ResultPersister::new(
        Arc::clone(&store) as Arc<dyn ContentStore>
    ));
    let runner = JobRunner::new(
        pipeline,
        persister,
        Arc::clone(&repository) as Arc<dyn JobRepository>,
    );

    TestHarness {
        runner,
        store,
        repository,
    }
}

fn url_job(post_process: bool) -> Job {
    Job::new(
        AudioSource::RemoteUrl("https://example.com/audio.mp3".to_string()),
        None,
        post_process,
    )
}

#[tokio::test]
async fn given_n_in_progress_responses_when_polling_then_exactly_n_plus_one_polls() {
    let n = 4;
    let mut responses: Vec<PollStatus> = (0..n)
        .map(|_| PollStatus::InProgress("processing".to_string()))
        .collect();
    responses.push(PollStatus::Completed("done".to_string()));
    let provider = ScriptedProvider::new(responses);

    let outcome = poll_until_terminal(
        &provider,
        &TranscriptId::new("t"),
        instant_policy(100),
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(outcome, PollOutcome::Completed("done".to_string()));
    assert_eq!(provider.poll_count(), n + 1);
}

#[tokio::test]
async fn given_provider_never_terminates_when_polling_then_times_out_at_attempt_cap() {
    let provider = ScriptedProvider::new(vec![]);

    let outcome = poll_until_terminal(
        &provider,
        &TranscriptId::new("t"),
        instant_policy(7),
        |_| {},
    )
    .await
    .unwrap();

    assert_eq!(outcome, PollOutcome::TimedOut { attempts: 7 });
    assert_eq!(provider.poll_count(), 7);
}

#[tokio::test]
async fn given_observer_when_polling_then_sees_each_non_terminal_status() {
    let provider = ScriptedProvider::new(vec![
        PollStatus::InProgress("queued".to_string()),
        PollStatus::InProgress("processing".to_string()),
        PollStatus::Completed("done".to_string()),
    ]);

    let seen = Mutex::new(Vec::new());
    poll_until_terminal(&provider, &TranscriptId::new("t"), instant_policy(10), |s| {
        seen.lock().unwrap().push(s.to_string());
    })
    .await
    .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["queued", "processing"]);
}

#[tokio::test]
async fn given_completed_transcript_without_post_processing_then_record_body_is_raw_text() {
    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Completed(
        "hello world".to_string(),
    )]));
    let editor = Arc::new(MockEditor::cleaning("SHOULD NOT BE USED"));
    let h = harness(Arc::clone(&provider), Arc::clone(&editor));

    let job = url_job(false);
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Completed);
    let record_id = completion.record_id.expect("record created");
    let record = h.store.get(record_id).await.unwrap();
    assert_eq!(record.body, "hello world");
    assert_eq!(record.status, RecordStatus::Published);
    assert_eq!(editor.call_count(), 0);

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Completed);
    assert_eq!(stored.record_id, Some(record_id));
    assert!(!stored.post_processed);
}

#[tokio::test]
async fn given_provider_failure_then_failure_record_carries_detail_and_no_post_processing_runs() {
    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Failed(
        "bad audio".to_string(),
    )]));
    let editor = Arc::new(MockEditor::cleaning("unused"));
    let h = harness(Arc::clone(&provider), Arc::clone(&editor));

    let job = url_job(true);
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Failed);
    let record = h.store.get(completion.record_id.unwrap()).await.unwrap();
    assert!(record.body.contains("bad audio"));
    assert_eq!(record.status, RecordStatus::Draft);
    assert_eq!(editor.call_count(), 0);

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(stored.status, JobStatus::Failed);
    assert!(stored.error_message.unwrap().contains("bad audio"));
}

#[tokio::test]
async fn given_editor_success_when_post_processing_then_cleaned_text_is_persisted() {
    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Completed(
        "raw words no punctuation".to_string(),
    )]));
    let editor = Arc::new(MockEditor::cleaning("Raw words, no punctuation."));
    let h = harness(provider, Arc::clone(&editor));

    let job = url_job(true);
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    let record = h.store.get(completion.record_id.unwrap()).await.unwrap();
    assert_eq!(record.body, "Raw words, no punctuation.");
    assert_eq!(editor.call_count(), 1);

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert!(stored.post_processed);
}

#[tokio::test]
async fn given_editor_failure_when_post_processing_then_raw_text_is_persisted() {
    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Completed(
        "raw transcript".to_string(),
    )]));
    let editor = Arc::new(MockEditor::failing());
    let h = harness(provider, Arc::clone(&editor));

    let job = url_job(true);
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Completed);
    let record = h.store.get(completion.record_id.unwrap()).await.unwrap();
    assert_eq!(record.body, "raw transcript");
    assert_eq!(editor.call_count(), 1);

    let stored = h.repository.get_by_id(job.id).await.unwrap().unwrap();
    assert!(!stored.post_processed);
}

#[tokio::test]
async fn given_submission_failure_then_job_fails_without_any_polls() {
    let provider = Arc::new(ScriptedProvider::failing_submit("invalid audio_url"));
    let editor = Arc::new(MockEditor::cleaning("unused"));
    let h = harness(Arc::clone(&provider), editor);

    let job = url_job(false);
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Failed);
    assert_eq!(provider.poll_count(), 0);
    let record = h.store.get(completion.record_id.unwrap()).await.unwrap();
    assert!(record.body.contains("invalid audio_url"));
}

#[tokio::test]
async fn given_poll_budget_exhausted_then_timeout_failure_is_persisted() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let editor = Arc::new(MockEditor::cleaning("unused"));

    let store = Arc::new(MemoryContentStore::new());
    let repository = Arc::new(MemoryJobRepository::new());
    let pipeline = Arc::new(TranscriptionPipeline::new(
        Arc::new(FfmpegTranscoder::new()),
        provider,
        editor,
        instant_policy(3),
    ));
    let persister = Arc::new(ResultPersister::new(
        Arc::clone(&store) as Arc<dyn ContentStore>
    ));
    let runner = JobRunner::new(
        pipeline,
        persister,
        Arc::clone(&repository) as Arc<dyn JobRepository>,
    );

    let job = url_job(false);
    repository.create(&job).await.unwrap();
    let completion = runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Failed);
    let record = store.get(completion.record_id.unwrap()).await.unwrap();
    assert!(record.body.contains("3 status checks"));
}

#[tokio::test]
async fn given_parent_document_then_completion_appends_labeled_section() {
    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Completed(
        "appended text".to_string(),
    )]));
    let editor = Arc::new(MockEditor::cleaning("unused"));
    let h = harness(provider, editor);

    let parent_id = h
        .store
        .insert("Sermon notes", "Original notes.", RecordStatus::Published)
        .await;

    let job = Job::new(
        AudioSource::RemoteUrl("https://example.com/audio.mp3".to_string()),
        Some(parent_id),
        false,
    );
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Completed);
    let parent = h.store.get(parent_id).await.unwrap();
    assert!(parent.body.starts_with("Original notes."));
    assert!(parent.body.contains("Transcript: appended text"));
    assert!(parent.body.ends_with("appended text"));
}

#[tokio::test]
async fn given_concurrent_appends_to_same_parent_then_at_least_one_section_survives() {
    let store = Arc::new(MemoryContentStore::new());
    let parent_id = store.insert("Parent", "", RecordStatus::Published).await;

    let persister = Arc::new(ResultPersister::new(
        Arc::clone(&store) as Arc<dyn ContentStore>
    ));

    let payload_a = skrivari::domain::SuccessPayload {
        text: "first transcript".to_string(),
        post_processed: false,
    };
    let payload_b = skrivari::domain::SuccessPayload {
        text: "second transcript".to_string(),
        post_processed: false,
    };

    let (a, b) = tokio::join!(
        persister.persist_success(None, &payload_a, Some(parent_id)),
        persister.persist_success(None, &payload_b, Some(parent_id)),
    );
    a.unwrap();
    b.unwrap();

    let parent = store.get(parent_id).await.unwrap();
    let has_first = parent.body.contains("first transcript");
    let has_second = parent.body.contains("second transcript");
    assert!(has_first || has_second);
}

struct ConflictingStore {
    inner: MemoryContentStore,
    conflicts_left: AtomicU32,
}

impl ConflictingStore {
    fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryContentStore::new(),
            conflicts_left: AtomicU32::new(conflicts),
        }
    }
}

#[async_trait]
impl ContentStore for ConflictingStore {
    async fn create(
        &self,
        title: &str,
        body: &str,
        status: RecordStatus,
    ) -> Result<RecordId, ContentStoreError> {
        self.inner.create(title, body, status).await
    }

    async fn get(
        &self,
        id: RecordId,
    ) -> Result<skrivari::application::ports::StoredRecord, ContentStoreError> {
        self.inner.get(id).await
    }

    async fn update_if_unchanged(
        &self,
        id: RecordId,
        expected: RecordRevision,
        body: &str,
    ) -> Result<RecordRevision, ContentStoreError> {
        if self.conflicts_left.load(Ordering::SeqCst) > 0 {
            self.conflicts_left.fetch_sub(1, Ordering::SeqCst);
            return Err(ContentStoreError::Conflict);
        }
        self.inner.update_if_unchanged(id, expected, body).await
    }
}

#[tokio::test]
async fn given_one_revision_conflict_when_appending_then_retry_succeeds() {
    let store = Arc::new(ConflictingStore::new(1));
    let parent_id = store
        .inner
        .insert("Parent", "Notes.", RecordStatus::Published)
        .await;
    let persister = ResultPersister::new(Arc::clone(&store) as Arc<dyn ContentStore>);

    let payload = skrivari::domain::SuccessPayload {
        text: "retried append".to_string(),
        post_processed: false,
    };
    persister
        .persist_success(None, &payload, Some(parent_id))
        .await
        .unwrap();

    let parent = store.inner.get(parent_id).await.unwrap();
    assert!(parent.body.contains("retried append"));
}

#[tokio::test]
async fn given_unending_revision_conflicts_when_appending_then_record_survives_without_append() {
    let store = Arc::new(ConflictingStore::new(u32::MAX));
    let parent_id = store
        .inner
        .insert("Parent", "Notes.", RecordStatus::Published)
        .await;
    let persister = ResultPersister::new(Arc::clone(&store) as Arc<dyn ContentStore>)
        .with_append_retries(2);

    let payload = skrivari::domain::SuccessPayload {
        text: "never lands".to_string(),
        post_processed: false,
    };
    let record_id = persister
        .persist_success(None, &payload, Some(parent_id))
        .await
        .unwrap();

    // The result record is kept even though the append never landed.
    let record = store.inner.get(record_id).await.unwrap();
    assert_eq!(record.body, "never lands");
    assert_eq!(record.status, RecordStatus::Published);

    let parent = store.inner.get(parent_id).await.unwrap();
    assert_eq!(parent.body, "Notes.");
}

#[tokio::test]
async fn given_spooled_local_file_then_it_is_deleted_after_terminal_state() {
    let dir = tempfile::tempdir().unwrap();
    let audio_path = dir.path().join("take.wav");
    tokio::fs::write(&audio_path, b"tiny audio").await.unwrap();

    let provider = Arc::new(ScriptedProvider::new(vec![PollStatus::Completed(
        "spooled result".to_string(),
    )]));
    let editor = Arc::new(MockEditor::cleaning("unused"));
    let h = harness(provider, editor);

    let job = Job::new(
        AudioSource::LocalFile {
            path: audio_path.clone(),
            original_filename: "take.wav".to_string(),
            delete_after: true,
        },
        None,
        false,
    );
    h.repository.create(&job).await.unwrap();
    let completion = h.runner.run_job(&job).await;

    assert_eq!(completion.status, JobStatus::Completed);
    assert!(!audio_path.exists());

    let record = h.store.get(completion.record_id.unwrap()).await.unwrap();
    assert_eq!(record.title, "take");
    assert_eq!(record.body, "spooled result");
}
