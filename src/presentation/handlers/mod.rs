mod health;
mod job_status;
mod submit;
mod upload;

pub use health::health_handler;
pub use job_status::job_status_handler;
pub use submit::submit_handler;
pub use upload::upload_handler;

use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
