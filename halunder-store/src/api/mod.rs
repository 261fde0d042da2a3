//! HTTP API handlers for halunder-store

pub mod error;
pub mod export;
pub mod health;
pub mod sentences;
pub mod texts;
pub mod users;

pub use error::{ApiError, ApiResult};
pub use export::export_csv;
pub use health::{get_status, health_routes};
pub use sentences::{delete_sentence, get_all_sentences, update_sentence};
pub use texts::create_text;
pub use users::get_users;
