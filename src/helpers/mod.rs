pub mod json;
pub mod namespace;
pub mod sequences;
pub mod text;
pub mod timezone;

pub use namespace::Namespace;
pub use sequences::{
    flatten, indexsecond_enumerate, merge_dicts, moving_window, predicate_from_first,
    MovingWindow,
};
pub use text::{comma_separator, exclamation, make_lex_separator, question, quote, sentence};
pub use timezone::TimeZone;
