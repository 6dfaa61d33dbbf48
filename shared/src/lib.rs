pub mod config;
pub mod error;
pub mod generation;
pub mod params;
pub mod progress;
pub mod session;
pub mod storage;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AuthError, GenerationError, ParamError, SelectError, StorageError, SubmitError};
pub use generation::{GenerateRequest, GenerateResponse, GeneratedImage, GenerationApi};
pub use params::{GenerationParameters, ParamName, ParamOption};
pub use progress::CosmeticProgress;
pub use session::{Identity, ProviderSession, SessionHub, Subscription, UserId};
pub use storage::{ObjectStorage, UploadOptions};
pub use workflow::{Selection, SubmitPlan, Workflow, WorkflowState, run_submission};
