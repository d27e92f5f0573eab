// Document generation for abbreviated criminal trials: sentences,
// prescription rulings and the office letters that follow them.
pub mod config;
pub mod error;
pub mod types {
    pub mod case_record;
    pub mod field_key;
}
pub mod grammar {
    pub mod agreement;
    pub mod lists;
    pub mod numerals;
    pub mod punctuation;
}
pub mod markup {
    pub mod document;
    pub mod highlight;
    pub mod sanitize;
}
pub mod render {
    pub mod context;
    pub mod letters;
    pub mod prescription;
    pub mod sections;
    pub mod sentence;
}
pub mod case_io;
pub mod session;

pub use config::Config;
pub use error::{CaseError, Result};
pub use types::case_record::CaseRecord;
