//! The bank module: balances, transfers and fee collection.
//!
//! Coins only change hands through a keeper. Modules that should not be
//! able to mint or burn receive a [`BaseSendKeeper`] or a [`BaseViewKeeper`]
//! instead of the full [`BaseKeeper`].
//!
//! # Example
//!
//! ```rust,no_run
//! use houchain_bank::{BaseKeeper, Keeper, SendKeeper, ViewKeeper};
//! use houchain_core::{Address, BlockHeader};
//! use houchain_storage::{AccountMapper, Context, GasMeter, Storage};
//!
//! let storage = Storage::open_temporary().unwrap();
//! let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
//! let keeper = BaseKeeper::new(AccountMapper);
//!
//! let alice = Address::from_seed("alice");
//! let bob = Address::from_seed("bob");
//! keeper.set_coins(&mut ctx, &alice, &"100mycoin".parse().unwrap()).unwrap();
//! keeper.send_coins(&mut ctx, &alice, &bob, &"60mycoin".parse().unwrap()).unwrap();
//! assert_eq!(keeper.get_coins(&mut ctx, &bob).unwrap().to_string(), "60mycoin");
//! ```

pub mod handler;
pub mod keeper;
pub mod msgs;

pub use handler::handle_msg;
pub use keeper::{
    BaseKeeper, BaseSendKeeper, BaseViewKeeper, GasCosts, Input, Keeper, Output, SendKeeper,
    ViewKeeper,
};
pub use msgs::{BankMsg, MsgSend};
