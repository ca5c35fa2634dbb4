//! Weighted, category-balanced JSONL dataset builder for LLM fine-tuning.
//!
//! Conversations are read from a directory of JSONL files, keyed by the
//! content of their assistant messages, sampled per category according to
//! configured weights, shuffled and written back out as a single JSONL file.
//! [`report`] tallies the assistant responses of such a file.

pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod logging;
pub mod report;
pub mod sampler;
pub mod writer;

pub use config::{BuildConfig, ReportConfig};
pub use error::DatasetError;
pub use extract::{extract_records, ConversationRecord};
pub use loader::load_corpus;
pub use report::{render_report, tally_responses, ResponseTally};
pub use sampler::{plan, sample, WeightSpec};
pub use writer::write_dataset;
