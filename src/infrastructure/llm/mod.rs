mod openai_editor;

pub use openai_editor::OpenAiEditor;
