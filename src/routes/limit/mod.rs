mod handler;
mod model;

pub use handler::{check_limit, limit_status};
pub use model::{LimitCheckResponse, LimitStatusResponse};
