mod health;
mod permalink;

pub use health::health_handler;
pub use permalink::{create_permalink_handler, get_permalink_handler, reporter_handler};
