// Domain-layer modules and shared errors/models
pub mod cpf {
    pub use crate::cpf::*;
}

pub mod mapper {
    pub use crate::mapper::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod presentation {
    pub use crate::presentation::*;
}

pub mod form {
    pub use crate::form::*;
}

pub mod errors {
    pub use crate::errors::*;
}
