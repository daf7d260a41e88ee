pub mod answer;
pub mod oracle;
pub mod resume;

pub use oracle::{LlmOracle, Oracle};
pub use resume::{load_resume, DocumentReader, PdfResumeReader};
