mod user;
mod worklog;

pub use user::WorklogAuthor;
pub use worklog::{Worklog, WorklogPage};
