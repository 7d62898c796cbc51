use crate::{
    adapter::{ResolvedAdapter, ResultAdapter, VoidAdapter},
    command::{Command, TypedCommand},
    command_handler::CommandHandler,
    dispatch_key::DispatchKey,
    error::{CommandError, CommandResult},
    locator::HandlerLocator,
};
use bon::Builder;
use dashmap::{DashMap, mapref::entry::Entry};
use std::sync::Arc;

type AdapterFactory = Arc<dyn Fn() -> ResolvedAdapter + Send + Sync>;

/// 重复注册策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// 同一调度身份只允许一个处理器，重复注册返回 `AlreadyRegistered`
    #[default]
    Reject,
    /// 以后注册者为准
    Replace,
}

/// 注册表配置
#[derive(Clone, Copy, Debug, Default, Builder)]
pub struct RegistryConfig {
    #[builder(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// 基于内存的 [`HandlerLocator`] 实现
/// - 以 `DispatchKey` 注册适配器工厂，每次解析都新建适配器
/// - `register*` 绑定共享处理器；`register*_factory` 每次解析新建处理器
#[derive(Builder)]
pub struct HandlerRegistry {
    #[builder(default)]
    config: RegistryConfig,
    #[builder(skip)]
    factories: DashMap<DispatchKey, AdapterFactory>,
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// 注册无返回值命令的处理器（共享实例）
    pub fn register<C, H>(&self, handler: Arc<H>) -> CommandResult<()>
    where
        C: Command,
        H: CommandHandler<C> + ?Sized + 'static,
    {
        self.insert(
            DispatchKey::void::<C>(),
            Arc::new(move || ResolvedAdapter::void(VoidAdapter::<H, C>::new(handler.clone()))),
        )
    }

    /// 注册无返回值命令的处理器（每次调度新建）
    pub fn register_factory<C, H, F>(&self, factory: F) -> CommandResult<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.insert(
            DispatchKey::void::<C>(),
            Arc::new(move || ResolvedAdapter::void(VoidAdapter::<H, C>::new(Arc::new(factory())))),
        )
    }

    /// 注册返回 `R` 的命令的处理器（共享实例）
    pub fn register_returning<C, R, H>(&self, handler: Arc<H>) -> CommandResult<()>
    where
        C: TypedCommand<R>,
        R: Send + 'static,
        H: CommandHandler<C, R> + ?Sized + 'static,
    {
        self.insert(
            DispatchKey::returning::<C, R>(),
            Arc::new(move || {
                ResolvedAdapter::returning::<_, R>(ResultAdapter::<H, C, R>::new(handler.clone()))
            }),
        )
    }

    /// 注册返回 `R` 的命令的处理器（每次调度新建）
    pub fn register_returning_factory<C, R, H, F>(&self, factory: F) -> CommandResult<()>
    where
        C: TypedCommand<R>,
        R: Send + 'static,
        H: CommandHandler<C, R> + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.insert(
            DispatchKey::returning::<C, R>(),
            Arc::new(move || {
                ResolvedAdapter::returning::<_, R>(ResultAdapter::<H, C, R>::new(Arc::new(
                    factory(),
                )))
            }),
        )
    }

    fn insert(&self, key: DispatchKey, factory: AdapterFactory) -> CommandResult<()> {
        match self.factories.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(factory);
            }
            Entry::Occupied(mut slot) => match self.config.duplicate_policy {
                DuplicatePolicy::Reject => return Err(CommandError::AlreadyRegistered(key)),
                DuplicatePolicy::Replace => {
                    tracing::debug!(%key, "replacing registered command handler");
                    slot.insert(factory);
                }
            },
        }

        tracing::debug!(%key, "command handler registered");
        Ok(())
    }

    pub fn contains(&self, key: &DispatchKey) -> bool {
        self.factories.contains_key(key)
    }

    /// 获取已注册的调度身份列表（只读视图）
    pub fn registered_commands(&self) -> Vec<DispatchKey> {
        self.factories.iter().map(|e| *e.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl HandlerLocator for HandlerRegistry {
    fn resolve(&self, key: &DispatchKey) -> CommandResult<ResolvedAdapter> {
        // 先取出工厂再调用，避免持有分片锁时执行用户代码
        let Some(factory) = self.factories.get(key).map(|f| f.clone()) else {
            return Err(CommandError::HandlerNotFound(*key));
        };

        Ok(factory())
    }
}
