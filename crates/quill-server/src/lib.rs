//! HTTP surface for quill: blog post CRUD, form submissions and uploads

pub mod error;
pub mod extract;
pub mod forms;
pub mod posts;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::QuillServer;
pub use state::AppState;
