use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Units = i64;
pub type Amount = i64;

/// A registered security. Stored in the keyed store under its ISIN.
///
/// `total_units` is the supply ceiling fixed at registration;
/// `available_units` is the inventory still open for subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub isin: String,
    pub company_name: String,
    pub asset_type: String,
    pub total_units: Units,
    pub price_per_unit: Amount,
    pub available_units: Units,
}

/// An investor account. Stored in the keyed store under its investor id.
///
/// `subscribed` maps ISIN to held units. A `BTreeMap` keeps both the
/// persisted bytes and the portfolio output in lexicographic ISIN order,
/// so replaying the same transaction always produces identical output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investor {
    pub investor_id: String,
    pub balance: Amount,
    pub subscribed: BTreeMap<String, Units>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TradeError {
    #[error("insufficient balance to subscribe")]
    InsufficientFunds,
    #[error("not enough available units")]
    InsufficientInventory,
    #[error("insufficient units to redeem")]
    InsufficientHoldings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Subscription,
    Redemption,
}

/// A validated accounting transition between one investor and one asset.
///
/// Constructed only by [`Trade::subscription`] / [`Trade::redemption`],
/// which run every guard against the pre-trade records. Applying a trade
/// never fails; validation and mutation are kept separate so a guard
/// failure leaves both records untouched.
#[derive(Debug)]
pub struct Trade {
    isin: String,
    units: Units,
    gross: Amount,
    kind: TradeKind,
}

impl Trade {
    pub fn subscription(
        investor: &Investor,
        asset: &Asset,
        units: Units,
    ) -> Result<Self, TradeError> {
        let gross = units * asset.price_per_unit;
        if investor.balance < gross {
            return Err(TradeError::InsufficientFunds);
        }
        if units > asset.available_units {
            return Err(TradeError::InsufficientInventory);
        }
        Ok(Self {
            isin: asset.isin.clone(),
            units,
            gross,
            kind: TradeKind::Subscription,
        })
    }

    pub fn redemption(
        investor: &Investor,
        asset: &Asset,
        units: Units,
    ) -> Result<Self, TradeError> {
        if investor.holding(&asset.isin) < units {
            return Err(TradeError::InsufficientHoldings);
        }
        Ok(Self {
            isin: asset.isin.clone(),
            units,
            gross: units * asset.price_per_unit,
            kind: TradeKind::Redemption,
        })
    }
}

impl Asset {
    /// Build a fresh asset record with the whole supply available.
    pub fn register(
        isin: String,
        company_name: String,
        asset_type: String,
        total_units: Units,
        price_per_unit: Amount,
    ) -> Self {
        Self {
            isin,
            company_name,
            asset_type,
            total_units,
            price_per_unit,
            available_units: total_units,
        }
    }

    pub fn apply(&mut self, trade: &Trade) {
        match trade.kind {
            TradeKind::Subscription => self.available_units -= trade.units,
            TradeKind::Redemption => self.available_units += trade.units,
        }
    }
}

impl Investor {
    pub fn new(investor_id: String, balance: Amount) -> Self {
        Self {
            investor_id,
            balance,
            subscribed: BTreeMap::new(),
        }
    }

    /// Units held for `isin`; an absent entry means zero.
    pub fn holding(&self, isin: &str) -> Units {
        self.subscribed.get(isin).copied().unwrap_or(0)
    }

    pub fn apply(&mut self, trade: &Trade) {
        let held = self.subscribed.entry(trade.isin.clone()).or_insert(0);
        match trade.kind {
            TradeKind::Subscription => {
                *held += trade.units;
                self.balance -= trade.gross;
            }
            TradeKind::Redemption => {
                *held -= trade.units;
                self.balance += trade.gross;
            }
        }
    }

    /// Human-readable portfolio: balance, then one `ISIN: units` line per
    /// holding in lexicographic ISIN order.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Investor ID: {}", self.investor_id),
            format!("Balance: {}", self.balance),
        ];
        for (isin, units) in &self.subscribed {
            lines.push(format!("{isin}: {units}"));
        }
        lines.join("\n")
    }
}
