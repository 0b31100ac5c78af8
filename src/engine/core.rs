// 12.1 engine/core.rs: the engine aggregate. owns parameter snapshots, the
// oracle and ledger seams, the global market, all accounts, and the event
// log. &mut self on every mutating call is the single-writer discipline:
// callers serialize through one engine per market.

use super::config::EngineConfig;
use super::results::EngineError;
use crate::account::Account;
use crate::events::{ClosedUpdatedEvent, Event, EventId, EventPayload, FeeClaimedEvent};
use crate::ledger::CollateralLedger;
use crate::market::Market;
use crate::math::{UFixed18, UFixed6};
use crate::oracle::Oracle;
use crate::params::{MarketParams, ProtocolParams};
use crate::types::AccountId;
use std::collections::HashMap;

#[derive(Debug)]
pub struct Engine<O: Oracle, L: CollateralLedger> {
    pub(super) config: EngineConfig,
    pub(super) market_params: MarketParams,
    pub(super) protocol_params: ProtocolParams,
    pub(super) oracle: O,
    pub(super) ledger: L,
    pub(super) market: Market,
    pub(super) accounts: HashMap<AccountId, Account>,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
}

impl<O: Oracle, L: CollateralLedger> Engine<O, L> {
    pub fn new(
        config: EngineConfig,
        market_params: MarketParams,
        protocol_params: ProtocolParams,
        mut oracle: O,
        ledger: L,
    ) -> Self {
        let genesis = oracle.sync();
        Self {
            config,
            market_params,
            protocol_params,
            oracle,
            ledger,
            market: Market::new(genesis.version),
            accounts: HashMap::new(),
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn market_params(&self) -> &MarketParams {
        &self.market_params
    }

    pub fn protocol_params(&self) -> &ProtocolParams {
        &self.protocol_params
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    pub fn accounts_iter(&self) -> impl Iterator<Item = (&AccountId, &Account)> {
        self.accounts.iter()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub(super) fn ensure_account(&mut self, id: AccountId) {
        let version = self.market.latest_version;
        self.accounts
            .entry(id)
            .or_insert_with(|| Account::new(id, version));
    }

    /// Flip the closed flag. A closed market keeps settling but freezes
    /// economic accrual and rejects risk-increasing updates.
    pub fn set_closed(&mut self, closed: bool) {
        self.market_params.closed = closed;
        let version = self.market.latest_version;
        self.emit_event(EventPayload::ClosedUpdated(ClosedUpdatedEvent {
            closed,
            version,
        }));
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.protocol_params.paused = paused;
    }

    /// Replace the market parameter snapshot. Takes effect for versions
    /// settled after this call.
    pub fn set_market_params(&mut self, params: MarketParams) {
        self.market_params = params;
    }

    pub fn set_protocol_params(&mut self, params: ProtocolParams) {
        self.protocol_params = params;
    }

    /// Pay accrued protocol and market fees out to `recipient`. Totals are
    /// truncated to the settlement asset; sub-truncation dust stays in the
    /// market's ledger balance.
    pub fn claim_fees(&mut self, recipient: AccountId) -> Result<(UFixed6, UFixed6), EngineError> {
        let protocol = self.market.protocol_fee.to_ufixed6();
        let market = self.market.market_fee.to_ufixed6();
        let total = protocol.add(market)?;

        if !total.is_zero() {
            self.ledger.transfer(recipient, total)?;
        }
        self.market.protocol_fee = UFixed18::ZERO;
        self.market.market_fee = UFixed18::ZERO;

        self.emit_event(EventPayload::FeeClaimed(FeeClaimedEvent {
            recipient,
            protocol,
            market,
        }));
        Ok((protocol, market))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let timestamp = self.oracle.current_version().timestamp;
        let event = Event::new(EventId(self.next_event_id), timestamp, payload);
        self.next_event_id += 1;

        if self.config.verbose {
            println!("[Event {}] {:?}", event.id.0, event.payload);
        }

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
