//! Package manager detection.

pub mod package_manager;

pub use package_manager::{
    select_manager, DetectionSignal, ManagerDetection, PackageManager, PackageManagerDetector,
    USER_AGENT_ENV,
};
