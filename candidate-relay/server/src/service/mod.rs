mod candidate;
pub mod error;

pub use self::candidate::CandidateService;
