mod error;
mod hash_list;
mod prepare;
mod pull;

pub use error::{Error, Result};
pub use hash_list::HashList;
pub use prepare::prepare;
pub use pull::{pull, pull_to_writer, PullSummary};
