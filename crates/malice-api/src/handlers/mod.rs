mod health;
mod scan;

pub use health::health_check;
pub use scan::scan_upload;
