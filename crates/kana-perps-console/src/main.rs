/*
[INPUT]:  CLI arguments, optional YAML configuration file
[OUTPUT]: Trade API reads and unsigned transaction previews printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kana_perps_adapter::{
    AccountBalances, ApiRequest, Direction, KanaClient, Leverage, OrderType, TradeSide,
    TransactionGateway,
};
use kana_perps_console::{ConsoleConfig, OrderForm, TransactionIntent, TransferAmount};

#[derive(Parser, Debug)]
#[command(name = "kana-perps-console", version, about = "Kana Labs perpetuals console")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the trade API health endpoint
    Health,
    /// List every perpetual market
    Markets,
    /// Trading, wallet and APT balances of an account
    Balances {
        #[arg(long)]
        address: String,
        #[arg(long = "market-id")]
        market_id: Option<u64>,
    },
    /// Order history of an account
    History {
        #[arg(long)]
        address: String,
        #[arg(long = "market-id")]
        market_id: Option<u64>,
    },
    /// Resting orders of an account
    OpenOrders {
        #[arg(long)]
        address: String,
        #[arg(long = "market-id")]
        market_id: Option<u64>,
    },
    /// Fetch the unsigned payload for an order
    PreviewOrder(PreviewOrderArgs),
    /// Fetch the unsigned payload for a deposit or withdraw
    PreviewTransfer {
        #[arg(value_enum)]
        kind: TransferKind,
        /// Whole USDC
        #[arg(long)]
        amount: Decimal,
        #[arg(long = "market-id")]
        market_id: Option<u64>,
    },
}

#[derive(clap::Args, Debug)]
struct PreviewOrderArgs {
    #[arg(long = "market-id")]
    market_id: Option<u64>,
    /// USDC margin; amount becomes deposit x leverage
    #[arg(long, conflicts_with = "amount")]
    deposit: Option<Decimal>,
    /// Order amount in USDC; deposit is derived from it
    #[arg(long)]
    amount: Option<Decimal>,
    #[arg(long, default_value_t = Leverage::MAX)]
    leverage: u8,
    #[arg(long, value_enum, default_value = "long")]
    side: SideArg,
    #[arg(long)]
    close: bool,
    /// Limit price; places a limit order when set
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long = "take-profit", requires = "price")]
    take_profit: Option<Decimal>,
    #[arg(long = "stop-loss", requires = "price")]
    stop_loss: Option<Decimal>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Long,
    Short,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TransferKind {
    Deposit,
    Withdraw,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(args.config_path.as_ref())?;
    info!(
        api_base_url = %config.api_base_url,
        market = %config.market,
        "starting kana-perps-console"
    );

    let client = KanaClient::with_config_and_base_url(config.client_config(), &config.api_base_url)
        .context("build trade API client")?;

    match args.command {
        Command::Health => {
            let healthy = client.health().await.context("health check")?;
            print_json(&serde_json::json!({ "status": healthy }))?;
        }
        Command::Markets => {
            let markets = client.all_markets().await.context("list markets")?;
            print_json(&markets)?;
        }
        Command::Balances { address, market_id } => {
            let market_id = resolve_market(&client, &config, market_id).await?;
            let balances = AccountBalances {
                trading_usdc: client
                    .trading_account_balance(market_id, &address)
                    .await
                    .context("trading account balance")?,
                wallet_usdc: client
                    .wallet_account_balance(market_id, &address)
                    .await
                    .context("wallet account balance")?,
                apt: client
                    .account_apt_balance(market_id, &address)
                    .await
                    .context("APT balance")?,
            };
            print_json(&balances)?;
        }
        Command::History { address, market_id } => {
            let market_id = resolve_market(&client, &config, market_id).await?;
            let history = client
                .order_history(market_id, &address)
                .await
                .context("order history")?;
            let rows = history
                .iter()
                .map(|entry| HistoryRow {
                    order_id: entry.short_order_id(),
                    side: format!("{:?}", entry.side()),
                    order_type: entry.order_type.clone(),
                    total_filled: entry.total_filled,
                    average_price: entry.average_price_usdc(),
                })
                .collect::<Vec<_>>();
            print_json(&rows)?;
        }
        Command::OpenOrders { address, market_id } => {
            let market_id = resolve_market(&client, &config, market_id).await?;
            let orders = client
                .open_orders(market_id, &address)
                .await
                .context("open orders")?;
            print_json(&orders)?;
        }
        Command::PreviewOrder(order) => {
            let market_id = resolve_market(&client, &config, order.market_id).await?;
            let params = build_order(market_id, &order)?.into_params();
            let intent = TransactionIntent::Order(&params);
            intent.validate_amount()?;
            preview(&client, intent.build_request()?).await?;
        }
        Command::PreviewTransfer {
            kind,
            amount,
            market_id,
        } => {
            let market_id = resolve_market(&client, &config, market_id).await?;
            let usdc = TransferAmount::from_input(amount).value();
            if usdc != amount {
                warn!(requested = %amount, sent = %usdc, "transfer amount truncated to whole USDC");
            }
            let intent = match kind {
                TransferKind::Deposit => TransactionIntent::Deposit { market_id, usdc },
                TransferKind::Withdraw => TransactionIntent::Withdraw { market_id, usdc },
            };
            intent.validate_amount()?;
            preview(&client, intent.build_request()?).await?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct HistoryRow {
    order_id: String,
    side: String,
    order_type: String,
    total_filled: Decimal,
    average_price: Decimal,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<ConsoleConfig> {
    let Some(path) = path else {
        return Ok(ConsoleConfig::default());
    };
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    ConsoleConfig::from_file(path_str).context("load config")
}

async fn resolve_market(
    client: &KanaClient,
    config: &ConsoleConfig,
    market_id: Option<u64>,
) -> Result<u64> {
    if let Some(market_id) = market_id {
        return Ok(market_id);
    }
    let market = client
        .find_market(&config.market)
        .await
        .context("look up market")?
        .with_context(|| format!("market {} not listed", config.market))?;
    info!(market = %market.base_name, market_id = market.market_id, "market resolved");
    Ok(market.market_id)
}

fn build_order(market_id: u64, args: &PreviewOrderArgs) -> Result<OrderForm> {
    let mut form = OrderForm::new(market_id);
    form.set_leverage(Leverage::new(args.leverage)?)?;
    form.set_trade_side(match args.side {
        SideArg::Long => TradeSide::Long,
        SideArg::Short => TradeSide::Short,
    });
    if args.close {
        form.set_direction(Direction::Close);
    }

    match (args.deposit, args.amount) {
        (Some(deposit), _) => form.set_deposit(deposit)?,
        (None, Some(amount)) => form.set_amount(amount),
        (None, None) => bail!("either --deposit or --amount is required"),
    }

    if let Some(price) = args.price {
        form.set_order_type(OrderType::Limit);
        form.set_price(price);
        form.set_take_profit(args.take_profit);
        form.set_stop_loss(args.stop_loss);
    }
    Ok(form)
}

async fn preview(client: &KanaClient, request: ApiRequest) -> Result<()> {
    info!(endpoint = %request.endpoint, query = %request.query_string(), "requesting payload");
    let payload = client
        .submit_order_request(&request)
        .await
        .context("fetch transaction payload")?;
    print_json(&payload)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("encode output")?;
    println!("{text}");
    Ok(())
}
