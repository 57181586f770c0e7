mod search;
mod series;
mod user;

pub use search::*;
pub use series::*;
pub use user::*;
