//! Message routing and the transaction lifecycle hooks.

use crate::tx::Tx;
use houchain_bank::{BankMsg, BaseKeeper};
use houchain_core::{Address, Result, Tags, TxError};
use houchain_governance::{GovMsg, GovParams, Keeper as GovKeeper, StoreDelegations};
use houchain_storage::{AccountMapper, Context};
use serde::{Deserialize, Serialize};

/// Every message the application understands.
///
/// In JSON each variant carries its own `type` discriminator
/// (`bank/send`, `gov/submit_proposal`, `gov/vote`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Msg {
    Bank(BankMsg),
    Gov(GovMsg),
}

impl Msg {
    /// Name of the module handling this message.
    pub fn route(&self) -> &'static str {
        match self {
            Msg::Bank(msg) => msg.route(),
            Msg::Gov(msg) => msg.route(),
        }
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            Msg::Bank(msg) => msg.msg_type(),
            Msg::Gov(msg) => msg.msg_type(),
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        match self {
            Msg::Bank(msg) => msg.validate_basic(),
            Msg::Gov(msg) => msg.validate_basic(),
        }
    }

    pub fn signers(&self) -> Vec<Address> {
        match self {
            Msg::Bank(msg) => msg.signers(),
            Msg::Gov(msg) => msg.signers(),
        }
    }
}

impl From<BankMsg> for Msg {
    fn from(msg: BankMsg) -> Self {
        Msg::Bank(msg)
    }
}

impl From<GovMsg> for Msg {
    fn from(msg: GovMsg) -> Self {
        Msg::Gov(msg)
    }
}

/// The application: module keepers wired together.
#[derive(Debug, Clone)]
pub struct App {
    bank: BaseKeeper,
    gov: GovKeeper,
}

impl App {
    pub fn new(params: GovParams) -> Self {
        let bank = BaseKeeper::new(AccountMapper);
        let gov = GovKeeper::new(bank.clone(), StoreDelegations, params);
        Self { bank, gov }
    }

    pub fn bank(&self) -> &BaseKeeper {
        &self.bank
    }

    pub fn gov(&self) -> &GovKeeper {
        &self.gov
    }

    /// Checks run before any message: stateless validation of the whole
    /// transaction, then fee collection from the first signer.
    pub fn ante(&self, ctx: &mut Context<'_>, tx: &Tx) -> Result<Tags> {
        tx.validate_basic()?;

        let fee_payer = tx
            .signers()
            .first()
            .copied()
            .ok_or_else(|| TxError::UnknownRequest("transaction has no signers".into()))?;

        if tx.fee.amount.is_empty() {
            return Ok(Tags::new());
        }
        self.bank.deduct_fees(ctx, &fee_payer, &tx.fee.amount)
    }

    /// Dispatch one message to its module.
    pub fn route(&self, ctx: &mut Context<'_>, msg: &Msg) -> Result<Tags> {
        match msg {
            Msg::Bank(msg) => houchain_bank::handle_msg(ctx, &self.bank, msg),
            Msg::Gov(msg) => houchain_governance::handle_msg(ctx, &self.gov, msg),
        }
    }

    /// Run every message of `tx` in order, stopping at the first failure.
    pub fn run_msgs(&self, ctx: &mut Context<'_>, tx: &Tx) -> Result<Tags> {
        let mut tags = Tags::new();
        for msg in &tx.msgs {
            tags.append(self.route(ctx, msg)?);
        }
        Ok(tags)
    }

    pub fn end_block(&self, ctx: &mut Context<'_>) -> Result<Tags> {
        self.gov.end_block(ctx)
    }
}
