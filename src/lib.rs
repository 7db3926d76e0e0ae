// Risk Console - Core Library
// Read-only data-view engine over a snapshot of credit-risk records,
// plus the loader, config and logging used by the console binary.

pub mod record;      // Record model, risk tiers, normalization
pub mod store;       // Immutable record snapshot
pub mod query;       // Search + tier filter
pub mod sort;        // Stable ordering by key
pub mod pagination;  // Fixed-size pages, page reconciliation
pub mod summary;     // Global overview statistics
pub mod export;      // Simple CSV export
pub mod view;        // render(store, state) pipeline
pub mod loader;      // JSON / CSV snapshot files
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use record::{
    EmploymentStatus, RawRecord, Record, RiskTier,
    DEFAULT_RISK_SCORE, HIGH_TIER_FLOOR, MEDIUM_TIER_FLOOR,
};
pub use store::RecordStore;
pub use query::{filter_records, matches_search, TierFilter};
pub use sort::{sort_records, SortKey};
pub use pagination::{paginate, reconcile_page, total_pages, Page, PAGE_SIZE};
pub use summary::{summarize, GlobalSummary, TierDistribution};
pub use export::{export_date, export_date_at, export_filename, to_csv_text, write_export, EXPORT_HEADERS};
pub use view::{ordered_view, render, ViewResult, ViewState};
pub use loader::{load_snapshot, SnapshotFormat};
pub use config::ConsoleConfig;
