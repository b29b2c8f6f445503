mod bounded_cache;
mod circular_queue;

pub use bounded_cache::BoundedCache;
pub use circular_queue::CircularQueue;
