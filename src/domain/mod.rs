pub mod config;
pub mod error;
pub mod locale;
pub mod message;
pub mod recipe;
pub mod stream;

pub use config::AppConfig;
pub use error::DomainError;
pub use locale::{Language, LocaleBundle, UiState};
pub use message::{ConversationLog, Message, Role};
pub use recipe::{RecipeEntry, RecipeShelf, ShelfItem, ShelfView};
pub use stream::ReplyStream;
