#![forbid(unsafe_code)]

//! SousChef: conversation orchestration and recipe memory for a recipe
//! chat assistant.
//!
//! The crate is the presentation-free core of the assistant. It owns the
//! dialogue history, merges multimodal submissions, drives the hosted
//! completion service, simulates incremental delivery of each reply, and
//! keeps the title-keyed catalog of saved recipes. The rendering toolkit,
//! the inference endpoint, and the speech-to-text engine all live behind
//! ports.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use app::{Session, SessionController, TurnInput};
pub use domain::{
    AppConfig, ConversationLog, DomainError, Language, LocaleBundle, Message, RecipeEntry,
    RecipeShelf, ReplyStream, Role, ShelfItem, ShelfView, UiState,
};
pub use ports::{CompletionClient, ConfigStore, GenerationParams, Transcriber, Transcript};
