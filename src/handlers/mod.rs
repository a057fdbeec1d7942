mod link;

pub use link::{redirect_handler, shorten_handler};
