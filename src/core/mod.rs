pub mod interpreter;
pub mod outcome;
pub mod report;
pub mod scanner;

pub use interpreter::{FileInterpreter, LoadSummary};
pub use outcome::{Outcome, ParseError, ParseErrorCategory, Severity};
pub use report::{Pairing, Report, ReportRegistry, ScoreWeights};
