pub mod session;
pub mod uploads;

pub use session::{AuthoringSession, WizardStep};
pub use uploads::{LecturePath, ResourceUploader, UploadTracker, VideoUploader};
