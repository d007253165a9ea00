//! 服务模块

pub mod binding;
pub mod composer;
pub mod dedup;
pub mod dispatcher;
pub mod scanner;

pub use binding::{
    BindService, BindingCache, BindingResolver, create_bind_service, create_binding_resolver,
};
pub use composer::{ComposerConfig, PageComposer, PageCreateRequest};
pub use dedup::EventDeduplicator;
pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use scanner::scan;
