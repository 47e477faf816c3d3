pub mod answerer;
pub mod indexer;
pub mod retriever;
pub mod session;

pub use answerer::{build_prompt, Answerer};
pub use indexer::{IndexReport, Indexer, UnreadablePolicy};
pub use retriever::Retriever;
pub use session::{QaSession, SessionOptions};
