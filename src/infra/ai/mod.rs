pub mod groq_client;
pub mod huggingface_client;

pub use groq_client::GroqClient;
pub use huggingface_client::HuggingFaceClient;
