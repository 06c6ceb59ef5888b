pub mod activities;
pub mod core;
pub mod employees;
pub mod leads;
pub mod main_module;
pub mod requests;
pub mod tasks;

pub use crate::core::config::AppConfig;
pub use crate::core::shared::error::{CrmError, CrmResult};
pub use crate::core::shared::state::{AppState, CrmStore};
pub use crate::main_module::build_router;
