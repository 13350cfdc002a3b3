//! Data shapes, screen state and screen flows shared by the native client
//! and the browser front end. Nothing in here performs I/O itself; the flows
//! drive whatever [`PromptBackend`] they are given.

pub mod backend;
pub mod category;
pub mod feed;
pub mod flow;
pub mod models;
pub mod profile;
pub mod rest;

pub use backend::{BackendError, PromptBackend};
pub use category::{Category, UnknownCategory};
pub use feed::FeedState;
pub use models::{
    AuthSession, BackendErrorBody, Like, LikedPrompt, PasswordCredentials, Prompt,
    RefreshTokenArgs, RowIdArgs, SessionUser,
};
pub use profile::{LikeToggle, ProfileState, ProfileTab};
