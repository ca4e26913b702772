pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_chat_migrations, run_user_migrations};
pub use repos::chat::{ChatRepo, ChatRow};
pub use repos::message::{MessageRepo, MessageRow};
pub use repos::user::{UserRepo, UserRow};
