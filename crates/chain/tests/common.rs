#![allow(dead_code)]

use houchain_bank::{BankMsg, MsgSend, ViewKeeper};
use houchain_chain::{init_genesis, Block, ChainConfig, Executor, GenesisAccount, GenesisState, Msg, StdFee, Tx};
use houchain_core::{Address, BlockHeader, Coins};
use houchain_governance::{Delegation, GovParams};
use houchain_storage::Storage;

pub const GAS: u64 = 100_000;

pub fn coins(s: &str) -> Coins {
    s.parse().unwrap()
}

pub fn addr(seed: &str) -> Address {
    Address::from_seed(seed)
}

pub fn genesis() -> GenesisState {
    GenesisState {
        genesis_time: 1_000,
        accounts: vec![
            GenesisAccount::new(addr("alice"), coins("10fee,100mycoin")),
            GenesisAccount::new(addr("carol"), coins("10fee,500mycoin")),
        ],
        delegations: vec![
            Delegation::new(addr("alice"), addr("validator"), 10),
            Delegation::new(addr("carol"), addr("validator"), 4),
        ],
        gov: GovParams {
            min_deposit: coins("100mycoin"),
            voting_period: 2,
            max_delegations: 10,
        },
    }
}

pub fn setup_with(genesis: &GenesisState) -> Storage {
    let storage = Storage::open_temporary().unwrap();
    init_genesis(&storage, genesis).unwrap();
    storage
}

pub fn setup() -> Storage {
    setup_with(&genesis())
}

pub fn executor(storage: &Storage) -> Executor<'_> {
    Executor::new(storage, ChainConfig::default()).unwrap()
}

pub fn tx(msg: impl Into<Msg>, fee: &str, gas: u64) -> Tx {
    Tx::new(vec![msg.into()], StdFee::new(coins(fee), gas))
}

pub fn send(from: &str, to: &str, amount: &str) -> BankMsg {
    BankMsg::Send(MsgSend::simple(addr(from), addr(to), coins(amount)))
}

/// Build the next block on top of the committed chain, ten seconds later.
pub fn next_block(executor: &Executor<'_>, txs: Vec<Tx>) -> Block {
    let last = executor.last_header().unwrap();
    Block::new(last.next(last.time + 10), txs)
}

pub fn header(height: i64, time: i64) -> BlockHeader {
    BlockHeader::new(height, time)
}

pub fn balance(executor: &Executor<'_>, seed: &str) -> Coins {
    executor
        .query(|app, ctx| app.bank().get_coins(ctx, &addr(seed)))
        .unwrap()
}
