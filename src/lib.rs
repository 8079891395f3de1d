// Library surface for headless/integration tests and reuse.
// The terminal itself is only touched from main.rs.
pub mod app;
pub mod app_dirs;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod error;
pub mod generator;
pub mod logging;
pub mod persist;
pub mod report;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod ui;

pub use classifier::{classify, Classification, Verdict};
pub use corpus::{CorpusStore, DirCorpusStore, EmbeddedCorpusStore, WordList};
pub use error::{EngineError, Result};
pub use generator::{ParagraphGenerator, TargetSequence, WordSelector};
pub use report::{Report, ReportEntry, ReportFormatter};
pub use session::{SessionPhase, SubmitOutcome, TestSession, TickOutcome, AVAILABLE_TIMES};
pub use stats::{LiveMetrics, SessionStats};
