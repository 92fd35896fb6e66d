mod memory_content_store;
mod memory_job_repository;

pub use memory_content_store::MemoryContentStore;
pub use memory_job_repository::MemoryJobRepository;
