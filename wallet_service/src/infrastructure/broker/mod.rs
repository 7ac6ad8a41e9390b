pub mod rabbit;
pub mod reply;

pub use rabbit::RabbitBroker;
pub use reply::{Delivery, ReplyPublisher};
