//! External service integrations.

pub mod webhook_client {
    pub use crate::webhook_client::*;
}

pub mod eligibility_models {
    pub use crate::eligibility_models::*;
}

pub mod services {
    pub use crate::services::*;
}
