mod progress_error;
mod pulse_error;
mod storage_error;

pub use progress_error::ProgressError;
pub use pulse_error::{PulseError, PulseResult};
pub use storage_error::StorageError;
