//! Match engine and result set.
//!
//! Pure functions only: nothing here touches the terminal or holds session state. A query is
//! split into whitespace-delimited tokens; each token narrows the survivors of the previous one
//! and contributes its positions to the highlight set of every survivor.

pub mod list;
pub mod matcher;
pub mod mode;
pub mod result;

pub use list::{Item, SourceList};
pub use matcher::{match_token, tokenize};
pub use mode::{MatchMode, ParseModeError};
pub use result::{MatchRecord, ResultEntry, ResultSet, Survivor, filter_list, filter_tokens};
