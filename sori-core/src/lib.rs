pub mod error;
pub mod language;
pub mod request;

pub use error::{Error, Result};
pub use language::infer_language;
pub use request::{RequestParameters, SynthesisRequest, SynthesisResult, TextValue};
