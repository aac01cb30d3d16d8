//! Routes bank messages to the keeper.

use crate::keeper::SendKeeper;
use crate::msgs::{BankMsg, MsgSend};
use houchain_core::{Result, Tags};
use houchain_storage::Context;

/// Handle a bank message. A transfer never needs mint or burn rights, so a
/// [`SendKeeper`] is enough.
pub fn handle_msg<K: SendKeeper>(ctx: &mut Context<'_>, keeper: &K, msg: &BankMsg) -> Result<Tags> {
    match msg {
        BankMsg::Send(msg) => handle_msg_send(ctx, keeper, msg),
    }
}

fn handle_msg_send<K: SendKeeper>(ctx: &mut Context<'_>, keeper: &K, msg: &MsgSend) -> Result<Tags> {
    msg.validate_basic()?;
    keeper.input_output_coins(ctx, &msg.inputs, &msg.outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keeper::{BaseKeeper, BaseSendKeeper, Keeper, ViewKeeper};
    use houchain_core::{Address, BlockHeader, Coins, TxError};
    use houchain_storage::{AccountMapper, GasMeter, Storage};

    #[test]
    fn test_handle_send() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        let alice = Address::from_seed("alice");
        let bob = Address::from_seed("bob");
        BaseKeeper::<AccountMapper>::default()
            .set_coins(&mut ctx, &alice, &"100mycoin".parse().unwrap())
            .unwrap();

        let keeper = BaseSendKeeper::new(AccountMapper);
        let msg = BankMsg::Send(MsgSend::simple(alice, bob, "60mycoin".parse().unwrap()));
        handle_msg(&mut ctx, &keeper, &msg).unwrap();

        let expected: Coins = "40mycoin".parse().unwrap();
        assert_eq!(keeper.get_coins(&mut ctx, &alice).unwrap(), expected);
        let expected: Coins = "60mycoin".parse().unwrap();
        assert_eq!(keeper.get_coins(&mut ctx, &bob).unwrap(), expected);
    }

    #[test]
    fn test_invalid_message_touches_nothing() {
        let storage = Storage::open_temporary().unwrap();
        let mut ctx = Context::new(&storage, BlockHeader::default(), GasMeter::infinite());
        let keeper = BaseSendKeeper::new(AccountMapper);
        let msg = BankMsg::Send(MsgSend::simple(
            Address::ZERO,
            Address::from_seed("bob"),
            "1mycoin".parse().unwrap(),
        ));

        let err = handle_msg(&mut ctx, &keeper, &msg).unwrap_err();
        assert!(matches!(err, TxError::InvalidAddress(_)));
        assert_eq!(ctx.gas_meter().consumed(), 0);
    }
}
