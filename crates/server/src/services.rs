mod backfill;
mod export;
pub(crate) mod metadata;
mod series;
mod session;
mod storage;
mod users;

pub use backfill::{backfill_covers, BackfillReport};
pub use export::{page_count, render_document, ExportEntry, ExportError, PdfExporter};
pub use metadata::{MetadataProvider, OmdbProvider, SearchOutcome};
pub use series::{next_id, sort, stats, SeriesError, SeriesStore};
pub use session::{removal_cookie, session_cookie, Session, SESSION_COOKIE};
pub use storage::{JsonStorage, StorageError, WriteGuard};
pub use users::{default_catalog, UserError, UserStore};
