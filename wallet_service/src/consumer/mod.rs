pub mod pool;
mod worker;

pub use pool::ConsumerPool;
