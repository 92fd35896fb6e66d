use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use skrivari::application::services::{
    JobQueue, JobRunner, PollPolicy, ResultPersister, TranscriptionPipeline,
};
use skrivari::infrastructure::llm::OpenAiEditor;
use skrivari::infrastructure::media::FfmpegTranscoder;
use skrivari::infrastructure::observability::{init_tracing, TracingConfig};
use skrivari::infrastructure::persistence::{MemoryContentStore, MemoryJobRepository};
use skrivari::infrastructure::transcription::AssemblyAiEngine;
use skrivari::presentation::{create_router, AppState, Settings};

const QUEUE_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();

    init_tracing(
        TracingConfig {
            environment: settings.environment.to_string(),
            level: settings.logging.level.clone(),
            json_format: settings.logging.enable_json,
        },
        settings.server.port,
    );

    let preprocessor = Arc::new(
        FfmpegTranscoder::new()
            .with_bin(settings.media.transcoder_bin.clone())
            .with_size_threshold(settings.media.size_threshold_bytes),
    );
    let provider = Arc::new(AssemblyAiEngine::new(
        settings.transcription.api_key.clone(),
        settings.transcription.base_url.clone(),
    ));
    let editor = Arc::new(OpenAiEditor::new(
        settings.post_processing.api_key.clone(),
        settings.post_processing.base_url.clone(),
        Some(settings.post_processing.model.clone()),
    ));
    let content_store = Arc::new(MemoryContentStore::new());
    let job_repository: Arc<dyn skrivari::application::ports::JobRepository> =
        Arc::new(MemoryJobRepository::new());

    let poll_policy = PollPolicy {
        interval: Duration::from_secs(settings.transcription.poll_interval_secs),
        max_attempts: settings.transcription.max_poll_attempts,
    };

    let pipeline = Arc::new(TranscriptionPipeline::new(
        preprocessor,
        provider,
        editor,
        poll_policy,
    ));
    let persister = Arc::new(ResultPersister::new(content_store));
    let runner = Arc::new(JobRunner::new(
        pipeline,
        persister,
        Arc::clone(&job_repository),
    ));

    let (job_queue, _worker_handle) = JobQueue::start(Arc::clone(&runner), QUEUE_CAPACITY);

    let state = AppState {
        job_repository,
        job_queue,
        runner,
        spool_dir: settings.media.spool_dir.clone(),
        max_upload_bytes: settings.media.max_upload_bytes,
        post_process_default: settings.post_processing.enabled,
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
