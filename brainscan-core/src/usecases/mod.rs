mod error;
mod rank_facilities;
mod validate_upload;

pub use self::{error::Error, rank_facilities::*, validate_upload::*};

mod prelude {
    pub use super::error::Error;
    pub type Result<T> = std::result::Result<T, Error>;
    pub use crate::entities::*;
}
