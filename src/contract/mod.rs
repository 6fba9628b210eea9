use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    command::Operation,
    record::{Amount, Asset, Investor, Trade, TradeError, Units},
};

pub mod in_memory_context;

pub const SUBSCRIPTION_EVENT: &str = "SubscriptionEvent";
pub const REDEMPTION_EVENT: &str = "RedemptionEvent";

/// Role attribute value required for Subscribe/Redeem.
pub const INVESTOR_ROLE: &str = "Investor";

/// Failure reported by the ledger host for a state read/write or an event
/// emission.
#[derive(Debug, Error)]
#[error("store operation failed: {0}")]
pub struct StoreError(pub String);

/// Capabilities the ledger host injects into every invocation: the keyed
/// record store, the caller's verified identity attributes, and the named
/// event channel.
///
/// The host owns the transaction boundary. Writes staged through
/// [`put_state`](Self::put_state) become visible together only if the whole
/// invocation succeeds; on error the host discards them.
pub trait TransactionContext {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    /// A verified attribute of the submitting caller, or `None` if the
    /// credential does not carry it.
    fn client_attribute(&self, name: &str) -> Option<String>;
    fn emit_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("only investors can trade assets")]
    Unauthorized,
    #[error("investor not found")]
    InvestorNotFound,
    #[error("asset not found")]
    AssetNotFound,
    #[error(transparent)]
    Trade(#[from] TradeError),
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The accounting contract. Stateless by design: every invocation reads and
/// writes ledger records only through the injected [`TransactionContext`],
/// and its outputs are a pure function of the arguments and the
/// pre-transaction store state.
#[derive(Debug, Default)]
pub struct AssetContract;

impl AssetContract {
    /// Dispatch one parsed operation. Query operations return their payload,
    /// mutations return `None`.
    pub fn invoke<C: TransactionContext>(
        &self,
        ctx: &mut C,
        operation: Operation,
    ) -> Result<Option<String>, ContractError> {
        match operation {
            Operation::CreateUser {
                investor_id,
                balance,
            } => self.create_user(ctx, investor_id, balance).map(|()| None),
            Operation::RegisterAsset {
                isin,
                company_name,
                asset_type,
                total_units,
                price_per_unit,
            } => self
                .register_asset(ctx, isin, company_name, asset_type, total_units, price_per_unit)
                .map(|()| None),
            Operation::SubscribeAsset {
                investor_id,
                isin,
                units,
            } => self
                .subscribe_asset(ctx, &investor_id, &isin, units)
                .map(|()| None),
            Operation::RedeemAsset {
                investor_id,
                isin,
                units,
            } => self
                .redeem_asset(ctx, &investor_id, &isin, units)
                .map(|()| None),
            Operation::GetPortfolio { investor_id } => {
                self.get_portfolio(ctx, &investor_id).map(Some)
            }
        }
    }

    /// Write a fresh investor record with empty holdings.
    ///
    /// No existence check: invoking again for the same id overwrites the
    /// record and resets its holdings.
    pub fn create_user<C: TransactionContext>(
        &self,
        ctx: &mut C,
        investor_id: String,
        balance: Amount,
    ) -> Result<(), ContractError> {
        let investor = Investor::new(investor_id, balance);
        put_record(ctx, &investor.investor_id, &investor)?;
        debug!(investor_id = %investor.investor_id, balance, "investor created");
        Ok(())
    }

    /// Write a fresh asset record with the whole supply available.
    ///
    /// No duplicate guard: re-registration overwrites the record and resets
    /// `available_units` to `total_units`.
    pub fn register_asset<C: TransactionContext>(
        &self,
        ctx: &mut C,
        isin: String,
        company_name: String,
        asset_type: String,
        total_units: Units,
        price_per_unit: Amount,
    ) -> Result<(), ContractError> {
        let asset = Asset::register(isin, company_name, asset_type, total_units, price_per_unit);
        put_record(ctx, &asset.isin, &asset)?;
        debug!(isin = %asset.isin, total_units, price_per_unit, "asset registered");
        Ok(())
    }

    pub fn subscribe_asset<C: TransactionContext>(
        &self,
        ctx: &mut C,
        investor_id: &str,
        isin: &str,
        units: Units,
    ) -> Result<(), ContractError> {
        require_investor_role(ctx)?;
        let mut investor = load_investor(ctx, investor_id)?;
        let mut asset = load_asset(ctx, isin)?;

        let trade = Trade::subscription(&investor, &asset, units)?;
        investor.apply(&trade);
        asset.apply(&trade);
        put_trade_records(ctx, &investor, &asset)?;
        debug!(investor_id, isin, units, "subscription applied");

        let payload = format!("Investor {investor_id} subscribed to {units} units of asset {isin}");
        ctx.emit_event(SUBSCRIPTION_EVENT, payload.into_bytes())?;
        Ok(())
    }

    pub fn redeem_asset<C: TransactionContext>(
        &self,
        ctx: &mut C,
        investor_id: &str,
        isin: &str,
        units: Units,
    ) -> Result<(), ContractError> {
        require_investor_role(ctx)?;
        let mut investor = load_investor(ctx, investor_id)?;
        let mut asset = load_asset(ctx, isin)?;

        let trade = Trade::redemption(&investor, &asset, units)?;
        investor.apply(&trade);
        asset.apply(&trade);
        put_trade_records(ctx, &investor, &asset)?;
        debug!(investor_id, isin, units, "redemption applied");

        let payload = format!("Investor {investor_id} redeemed {units} units of asset {isin}");
        ctx.emit_event(REDEMPTION_EVENT, payload.into_bytes())?;
        Ok(())
    }

    pub fn get_portfolio<C: TransactionContext>(
        &self,
        ctx: &C,
        investor_id: &str,
    ) -> Result<String, ContractError> {
        let investor = load_investor(ctx, investor_id)?;
        Ok(investor.summary())
    }
}

fn require_investor_role<C: TransactionContext>(ctx: &C) -> Result<(), ContractError> {
    match ctx.client_attribute("role") {
        Some(role) if role == INVESTOR_ROLE => Ok(()),
        _ => Err(ContractError::Unauthorized),
    }
}

fn load_investor<C: TransactionContext>(
    ctx: &C,
    investor_id: &str,
) -> Result<Investor, ContractError> {
    let bytes = ctx
        .get_state(investor_id)?
        .ok_or(ContractError::InvestorNotFound)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn load_asset<C: TransactionContext>(ctx: &C, isin: &str) -> Result<Asset, ContractError> {
    let bytes = ctx.get_state(isin)?.ok_or(ContractError::AssetNotFound)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn put_record<C: TransactionContext, T: Serialize>(
    ctx: &mut C,
    key: &str,
    record: &T,
) -> Result<(), ContractError> {
    let bytes = serde_json::to_vec(record)?;
    ctx.put_state(key, bytes)?;
    Ok(())
}

/// Persist both sides of a trade. Both records are encoded before the first
/// put, so an encoding failure cannot stage a half-written pair.
fn put_trade_records<C: TransactionContext>(
    ctx: &mut C,
    investor: &Investor,
    asset: &Asset,
) -> Result<(), ContractError> {
    let investor_bytes = serde_json::to_vec(investor)?;
    let asset_bytes = serde_json::to_vec(asset)?;
    ctx.put_state(&investor.investor_id, investor_bytes)?;
    ctx.put_state(&asset.isin, asset_bytes)?;
    Ok(())
}
