pub mod ai_handlers;
pub mod payment_handlers;
pub mod resume_handlers;
pub mod system_handlers;

pub use ai_handlers::*;
pub use payment_handlers::*;
pub use resume_handlers::*;
pub use system_handlers::*;
