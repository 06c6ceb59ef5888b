pub mod error;
pub mod extract;
pub mod state;
pub mod store;
pub mod utils;

pub use error::{CrmError, CrmResult};
pub use state::{AppState, CrmStore};
