//! Bank messages.

use crate::keeper::{Input, Output};
use houchain_core::{Address, Coins, Result, TxError};
use serde::{Deserialize, Serialize};

/// Messages routed to the bank module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BankMsg {
    #[serde(rename = "bank/send")]
    Send(MsgSend),
}

impl BankMsg {
    pub fn route(&self) -> &'static str {
        "bank"
    }

    pub fn msg_type(&self) -> &'static str {
        match self {
            BankMsg::Send(_) => "send",
        }
    }

    pub fn validate_basic(&self) -> Result<()> {
        match self {
            BankMsg::Send(msg) => msg.validate_basic(),
        }
    }

    pub fn signers(&self) -> Vec<Address> {
        match self {
            BankMsg::Send(msg) => msg.signers(),
        }
    }
}

/// A multi-input, multi-output transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

impl MsgSend {
    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self { inputs, outputs }
    }

    /// One sender, one recipient.
    pub fn simple(from: Address, to: Address, coins: Coins) -> Self {
        Self {
            inputs: vec![Input::new(from, coins.clone())],
            outputs: vec![Output::new(to, coins)],
        }
    }

    /// Stateless checks: every leg is well formed and the transfer neither
    /// creates nor destroys coins.
    pub fn validate_basic(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(TxError::InvalidCoins("no inputs to send transaction".into()));
        }
        if self.outputs.is_empty() {
            return Err(TxError::InvalidCoins("no outputs to send transaction".into()));
        }

        let mut total_in = Coins::empty();
        for input in &self.inputs {
            validate_leg(&input.address, &input.coins)?;
            total_in = total_in.plus(&input.coins);
        }

        let mut total_out = Coins::empty();
        for output in &self.outputs {
            validate_leg(&output.address, &output.coins)?;
            total_out = total_out.plus(&output.coins);
        }

        if total_in != total_out {
            return Err(TxError::InvalidCoins("inputs and outputs don't match".into()));
        }
        Ok(())
    }

    /// Canonical bytes a signer commits to.
    pub fn sign_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("message serialization should not fail")
    }

    /// Every input address must sign.
    pub fn signers(&self) -> Vec<Address> {
        self.inputs.iter().map(|input| input.address).collect()
    }
}

fn validate_leg(address: &Address, coins: &Coins) -> Result<()> {
    if address.is_empty() {
        return Err(TxError::InvalidAddress(address.to_hex()));
    }
    if !coins.is_valid() {
        return Err(TxError::InvalidCoins(coins.to_string()));
    }
    if !coins.is_positive() {
        return Err(TxError::InvalidCoins(coins.to_string()));
    }
    Ok(())
}
