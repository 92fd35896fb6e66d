mod assemblyai_engine;

pub use assemblyai_engine::AssemblyAiEngine;
