//! Host-side pieces of the recognizer: recorded landmark streams, the
//! training-data service client and the replay session used by the binary.

pub mod frame_source;
pub mod session;
pub mod training_data;

pub use frame_source::FrameSource;
pub use session::{Session, Summary};
pub use training_data::TrainingDataClient;
