pub mod error;
pub mod models;
pub mod source;
pub mod fetcher;

pub use error::{FetchError, Result};
pub use models::{MemberMessage, MessagePage};
pub use source::{HttpPageSource, PageSource, DEFAULT_BASE_URL};
pub use fetcher::{FetchPolicy, FetchSummary, Fetcher};
