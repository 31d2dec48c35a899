pub mod completion;
pub mod environment;
pub mod payments;
pub mod pipeline;
pub mod storage;
pub mod web;

pub use web::start_web_server;
