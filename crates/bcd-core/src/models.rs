pub mod findings;
pub mod form;
pub mod imaging;
pub mod patient;
pub mod visit;

pub use findings::Findings;
pub use form::FormModel;
pub use imaging::ImagingRecord;
pub use patient::PatientInfo;
pub use visit::VisitInfo;
