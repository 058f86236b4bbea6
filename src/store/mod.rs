mod posts;

pub use posts::{LoadOutcome, PostStore};
