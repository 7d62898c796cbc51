use async_trait::async_trait;
use command_bus::registry::{DuplicatePolicy, RegistryConfig};
use command_bus::{
    CancellationToken, Command, CommandBus, CommandError, CommandHandler, CommandResult,
    HandlerRegistry, LocatorCommandBus,
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("account not opened: {0}")]
    NotOpened(String),
    #[error("insufficient funds: balance={balance}, requested={requested}")]
    InsufficientFunds { balance: i64, requested: i64 },
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),
    #[error("balance overflow: balance={balance}, delta={delta}")]
    Overflow { balance: i64, delta: i64 },
}

impl From<AccountError> for CommandError {
    fn from(err: AccountError) -> Self {
        CommandError::Rejected(err.to_string())
    }
}

#[derive(Debug, Command)]
#[command(result = String)]
struct OpenAccount {
    initial_balance: i64,
}

#[derive(Debug, Command)]
#[command(result = i64)]
struct Deposit {
    account_id: String,
    amount: i64,
}

#[derive(Debug, Command)]
#[command(result = i64)]
struct Withdraw {
    account_id: String,
    amount: i64,
}

#[derive(Debug, Command)]
struct Audit {
    note: String,
}

#[derive(Debug, Command)]
struct CloseAccount {
    account_id: String,
}

#[derive(Default)]
struct Accounts {
    balances: DashMap<String, i64>,
}

impl Accounts {
    fn adjust(&self, account_id: &str, delta: i64) -> Result<i64, AccountError> {
        let mut balance = self
            .balances
            .get_mut(account_id)
            .ok_or_else(|| AccountError::NotOpened(account_id.to_string()))?;
        let next = balance
            .checked_add(delta)
            .ok_or(AccountError::Overflow {
                balance: *balance,
                delta,
            })?;
        if next < 0 {
            return Err(AccountError::InsufficientFunds {
                balance: *balance,
                requested: delta.saturating_neg(),
            });
        }
        *balance = next;
        Ok(next)
    }
}

struct AccountHandler {
    accounts: Arc<Accounts>,
}

#[async_trait]
impl CommandHandler<OpenAccount, String> for AccountHandler {
    async fn execute(
        &self,
        command: OpenAccount,
        _token: CancellationToken,
    ) -> CommandResult<String> {
        let id = Ulid::new().to_string();
        self.accounts
            .balances
            .insert(id.clone(), command.initial_balance);
        Ok(id)
    }
}

#[async_trait]
impl CommandHandler<Deposit, i64> for AccountHandler {
    async fn execute(&self, command: Deposit, token: CancellationToken) -> CommandResult<i64> {
        if token.is_cancelled() {
            return Err(CommandError::cancelled::<Deposit>());
        }
        Ok(self.accounts.adjust(&command.account_id, command.amount)?)
    }
}

#[async_trait]
impl CommandHandler<Withdraw, i64> for AccountHandler {
    async fn execute(&self, command: Withdraw, token: CancellationToken) -> CommandResult<i64> {
        if token.is_cancelled() {
            return Err(CommandError::cancelled::<Withdraw>());
        }
        let delta = command
            .amount
            .checked_neg()
            .ok_or(AccountError::InvalidAmount(command.amount))?;
        Ok(self.accounts.adjust(&command.account_id, delta)?)
    }
}

// 每次调度新建
struct AuditHandler;

#[async_trait]
impl CommandHandler<Audit> for AuditHandler {
    async fn execute(&self, command: Audit, _token: CancellationToken) -> CommandResult<()> {
        info!(note = %command.note, "audit");
        Ok(())
    }
}

fn wire() -> CommandResult<LocatorCommandBus> {
    let registry = Arc::new(HandlerRegistry::with_config(
        RegistryConfig::builder()
            .duplicate_policy(DuplicatePolicy::Reject)
            .build(),
    ));
    let handler = Arc::new(AccountHandler {
        accounts: Arc::new(Accounts::default()),
    });

    registry.register_returning::<OpenAccount, String, _>(handler.clone())?;
    registry.register_returning::<Deposit, i64, _>(handler.clone())?;
    registry.register_returning::<Withdraw, i64, _>(handler)?;
    registry.register_factory::<Audit, _, _>(|| AuditHandler)?;

    info!(handlers = registry.len(), "command handlers registered");
    Ok(LocatorCommandBus::builder().locator(registry).build())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,command_bus=debug")),
        )
        .init();

    let bus = wire()?;

    // 开户
    let id = bus
        .dispatch_returning::<String>(Box::new(OpenAccount {
            initial_balance: 1000,
        }))
        .await?;
    info!(%id, "opened");

    // 存款
    let balance = bus
        .dispatch_returning::<i64>(Box::new(Deposit {
            account_id: id.clone(),
            amount: 500,
        }))
        .await?;
    info!(balance, "deposited");

    // 取款
    let balance = bus
        .dispatch_returning::<i64>(Box::new(Withdraw {
            account_id: id.clone(),
            amount: 200,
        }))
        .await?;
    info!(balance, "withdrawn");

    bus.dispatch(Box::new(Audit {
        note: format!("account {id} settled"),
    }))
    .await?;

    // 余额不足 -> 处理器错误原样返回
    if let Err(err) = bus
        .dispatch_returning::<i64>(Box::new(Withdraw {
            account_id: id.clone(),
            amount: 10_000,
        }))
        .await
    {
        warn!(%err, "withdraw rejected");
    }

    // 已取消的信号仍会调用处理器，由处理器决定是否中止
    let token = CancellationToken::new();
    token.cancel();
    if let Err(err) = bus
        .dispatch_returning_with::<i64>(
            Box::new(Deposit {
                account_id: id.clone(),
                amount: 1,
            }),
            token,
        )
        .await
    {
        warn!(%err, cancelled = err.is_cancelled(), "deposit not applied");
    }

    // 未注册的命令 -> 返回 HandlerNotFound 错误
    let close = CloseAccount { account_id: id };
    info!(account_id = %close.account_id, "closing account");
    if let Err(err @ CommandError::HandlerNotFound(_)) = bus.dispatch(Box::new(close)).await {
        warn!(%err, fatal = err.is_fatal(), "no handler as expected");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(balance: i64) -> Accounts {
        let accounts = Accounts::default();
        accounts.balances.insert("acc".to_string(), balance);
        accounts
    }

    #[test]
    fn adjust_rejects_overflow_without_touching_balance() {
        let accounts = opened(i64::MAX - 1);

        let err = accounts.adjust("acc", 2).unwrap_err();
        assert!(matches!(err, AccountError::Overflow { delta: 2, .. }));
        assert_eq!(*accounts.balances.get("acc").unwrap(), i64::MAX - 1);
    }

    #[test]
    fn adjust_reports_insufficient_funds_for_extreme_withdrawal() {
        let accounts = opened(10);

        let err = accounts.adjust("acc", i64::MIN).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InsufficientFunds {
                balance: 10,
                requested: i64::MAX
            }
        ));
        assert_eq!(accounts.adjust("acc", -10).unwrap(), 0);
    }

    #[tokio::test]
    async fn withdraw_of_min_amount_is_rejected() {
        let accounts = Arc::new(opened(10));
        let handler = AccountHandler {
            accounts: accounts.clone(),
        };

        let err = handler
            .execute(
                Withdraw {
                    account_id: "acc".to_string(),
                    amount: i64::MIN,
                },
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Rejected(_)));
        assert_eq!(*accounts.balances.get("acc").unwrap(), 10);
    }
}
