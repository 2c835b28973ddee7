pub mod codec;
pub mod dispatch;
pub mod filters;
pub mod naming;
pub mod pipeline;
pub mod queue;
