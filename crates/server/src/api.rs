mod extract;
mod handlers;
mod router;

pub use extract::{AdminUser, CurrentUser};
pub use router::create_router;
