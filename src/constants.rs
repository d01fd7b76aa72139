/// Catalog source and extraction constants shared across the codebase

// Source listing: the detailed view of one ranked list, 250 entries per page
pub const DEFAULT_LIST_URLS: [&str; 2] = [
    "https://www.imdb.com/es-es/list/ls050782187/?view=detailed&count=250&page=1",
    "https://www.imdb.com/es-es/list/ls050782187/?view=detailed&count=250&page=2",
];

pub const DEFAULT_MAX_CATALOG_SIZE: usize = 500;
pub const DEFAULT_PAGE_ITEM_LIMIT: usize = 250;
pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 1000;
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "es-ES";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// Document store defaults
pub const DEFAULT_MONGO_DB: &str = "movie-analysis-2025";
pub const DEFAULT_MONGO_COLL: &str = "imdb-scraper";

pub const ENV_MONGO_URI: &str = "MONGO_URI";
pub const ENV_MONGO_DB: &str = "MONGO_DB";
pub const ENV_MONGO_COLL: &str = "MONGO_COLL";

// CSS selectors for one entry of the detailed list view
pub const ITEM_SELECTOR: &str = "li.ipc-metadata-list-summary-item";
pub const HEADER_SELECTOR: &str = "h3.ipc-title__text";
pub const METADATA_SELECTOR: &str = "span.dli-title-metadata-item";
pub const RATING_SELECTOR: &str = "span.ipc-rating-star--rating";
pub const VOTE_COUNT_SELECTOR: &str = "span.ipc-rating-star--voteCount";
pub const POSTER_SELECTOR: &str = "img.ipc-image";
pub const DESCRIPTION_SELECTOR: &str = ".title-description-plot-container .ipc-html-content-inner-div";
pub const CREDIT_SELECTOR: &str = ".title-description-credit a.ipc-link";

/// How many duplicate groups the audit table lists by default
pub const DEFAULT_AUDIT_TOP: usize = 10;
