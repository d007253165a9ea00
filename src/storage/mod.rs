//! 存储层模块
//!
//! 绑定记录的持久化，支持进程内存储和 SurrealDB。

pub mod factory;
pub mod memory;
pub mod repository;

#[cfg(feature = "surrealdb")]
pub mod surrealdb;

pub use factory::StorageFactory;
pub use memory::InMemoryBindingRepository;
pub use repository::BindingRepository;
