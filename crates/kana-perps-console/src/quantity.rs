/*
[INPUT]:  User edits to deposit, leverage, amount and order fields
[OUTPUT]: Consistent OrderParameters (amount/size derived from deposit x leverage)
[POS]:    Domain layer - quantity model for the order form
[UPDATE]: When sizing rules or form fields change
*/

use kana_perps_adapter::{
    AmountOutOfRange, Direction, Leverage, OrderParameters, OrderType, TradeSide,
};
use rust_decimal::Decimal;

/// Amount and size after a deposit or leverage edit. They are always equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedSize {
    pub amount: Decimal,
    pub size: Decimal,
}

/// `amount = size = deposit * leverage`; fails when the product overflows.
pub fn on_deposit_change(
    new_deposit: Decimal,
    leverage: Leverage,
) -> Result<DerivedSize, AmountOutOfRange> {
    let amount = new_deposit
        .checked_mul(leverage.as_decimal())
        .ok_or(AmountOutOfRange { value: new_deposit })?;
    Ok(DerivedSize {
        amount,
        size: amount,
    })
}

/// `deposit = amount / leverage`. Leverage is never derived from the amount.
pub fn on_amount_change(new_amount: Decimal, leverage: Leverage) -> Decimal {
    new_amount / leverage.as_decimal()
}

/// Same rule as a deposit edit, with the deposit held fixed.
pub fn on_leverage_change(
    new_leverage: Leverage,
    usdc_deposit: Decimal,
) -> Result<DerivedSize, AmountOutOfRange> {
    on_deposit_change(usdc_deposit, new_leverage)
}

/// `max(0, current + delta)`, for the +1/+10 style buttons.
pub fn increment_clamped(current: Decimal, delta: Decimal) -> Decimal {
    current.saturating_add(delta).max(Decimal::ZERO)
}

/// Order form state for one UI session.
///
/// Deposit and leverage are the independent inputs; editing the amount
/// directly flips the relationship and back-derives the deposit instead.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    params: OrderParameters,
}

impl OrderForm {
    pub fn new(market_id: u64) -> Self {
        Self {
            params: OrderParameters::new(market_id),
        }
    }

    pub fn params(&self) -> &OrderParameters {
        &self.params
    }

    pub fn into_params(self) -> OrderParameters {
        self.params
    }

    /// Rejected edits leave the form unchanged.
    pub fn set_deposit(&mut self, usdc_deposit: Decimal) -> Result<(), AmountOutOfRange> {
        let derived = on_deposit_change(usdc_deposit, self.params.leverage)?;
        self.params.usdc_deposit = usdc_deposit;
        self.apply(derived);
        Ok(())
    }

    pub fn set_leverage(&mut self, leverage: Leverage) -> Result<(), AmountOutOfRange> {
        let derived = on_leverage_change(leverage, self.params.usdc_deposit)?;
        self.params.leverage = leverage;
        self.apply(derived);
        Ok(())
    }

    /// Direct amount edit; size follows the amount so the two never diverge.
    pub fn set_amount(&mut self, amount: Decimal) {
        self.params.usdc_deposit = on_amount_change(amount, self.params.leverage);
        self.params.amount = amount;
        self.params.size = amount;
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.params.order_type = order_type;
    }

    pub fn set_price(&mut self, price: Decimal) {
        self.params.price = price;
    }

    pub fn set_trade_side(&mut self, trade_side: TradeSide) {
        self.params.trade_side = trade_side;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.params.direction = direction;
    }

    /// `None` clears the trigger; `Some(0)` is kept as a real value.
    pub fn set_take_profit(&mut self, take_profit: Option<Decimal>) {
        self.params.take_profit = take_profit;
    }

    pub fn set_stop_loss(&mut self, stop_loss: Option<Decimal>) {
        self.params.stop_loss = stop_loss;
    }

    fn apply(&mut self, derived: DerivedSize) {
        self.params.amount = derived.amount;
        self.params.size = derived.size;
    }
}

/// Whole-USDC amount for the deposit and withdraw dialogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferAmount(Decimal);

impl TransferAmount {
    /// Typed input is truncated to whole USDC and never negative.
    pub fn from_input(value: Decimal) -> Self {
        Self(value.floor().max(Decimal::ZERO))
    }

    pub fn increment(self, delta: Decimal) -> Self {
        Self(increment_clamped(self.0, delta))
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn leverage(value: u8) -> Leverage {
        Leverage::new(value).expect("valid leverage")
    }

    fn decimal_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..1_000_000_000, 0u32..=6).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
    }

    fn leverage_strategy() -> impl Strategy<Value = Leverage> {
        (Leverage::MIN..=Leverage::MAX).prop_map(leverage)
    }

    proptest! {
        #[test]
        fn deposit_change_sets_amount_and_size(
            deposit in decimal_strategy(),
            lev in leverage_strategy(),
        ) {
            let derived = on_deposit_change(deposit, lev).unwrap();
            prop_assert_eq!(derived.amount, deposit * Decimal::from(lev.get()));
            prop_assert_eq!(derived.amount, derived.size);
        }

        #[test]
        fn amount_change_back_derives_deposit(
            amount in decimal_strategy(),
            lev in leverage_strategy(),
        ) {
            let deposit = on_amount_change(amount, lev);
            prop_assert_eq!(deposit, amount / Decimal::from(lev.get()));

            let restored = on_deposit_change(deposit, lev).unwrap().amount;
            let tolerance = Decimal::new(1, 15);
            prop_assert!((restored - amount).abs() <= tolerance);
        }

        #[test]
        fn increment_never_goes_negative(
            current in decimal_strategy(),
            delta in -1_000_000i64..1_000_000,
        ) {
            prop_assert!(increment_clamped(current, Decimal::from(delta)) >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_form_deposit_then_leverage() {
        let mut form = OrderForm::new(1);
        form.set_deposit(dec!(5)).unwrap();
        assert_eq!(form.params().amount, dec!(100));
        assert_eq!(form.params().size, dec!(100));

        form.set_leverage(leverage(4)).unwrap();
        assert_eq!(form.params().amount, dec!(20));
        assert_eq!(form.params().size, dec!(20));
        assert_eq!(form.params().usdc_deposit, dec!(5));
    }

    #[test]
    fn test_form_amount_edit_keeps_leverage() {
        let mut form = OrderForm::new(1);
        form.set_leverage(leverage(10)).unwrap();
        form.set_amount(dec!(250));

        assert_eq!(form.params().leverage.get(), 10);
        assert_eq!(form.params().usdc_deposit, dec!(25));
        assert_eq!(form.params().size, dec!(250));

        form.set_leverage(leverage(5)).unwrap();
        assert_eq!(form.params().amount, dec!(125));
    }

    #[test]
    fn test_oversized_deposit_is_rejected() {
        let mut form = OrderForm::new(1);
        form.set_deposit(dec!(5)).unwrap();

        let err = form.set_deposit(Decimal::MAX).unwrap_err();
        assert_eq!(err, AmountOutOfRange { value: Decimal::MAX });
        assert_eq!(form.params().usdc_deposit, dec!(5));
        assert_eq!(form.params().amount, dec!(100));
    }

    #[test]
    fn test_leverage_overflow_keeps_previous_leverage() {
        let mut form = OrderForm::new(1);
        form.set_leverage(leverage(1)).unwrap();
        form.set_deposit(Decimal::MAX).unwrap();

        assert!(form.set_leverage(leverage(2)).is_err());
        assert_eq!(form.params().leverage.get(), 1);
        assert_eq!(form.params().amount, Decimal::MAX);
    }

    #[test]
    fn test_increment_saturates() {
        assert_eq!(increment_clamped(Decimal::MAX, dec!(10)), Decimal::MAX);
        assert_eq!(
            TransferAmount::from_input(Decimal::MAX).increment(dec!(1)).value(),
            Decimal::MAX
        );
    }

    #[test]
    fn test_form_triggers_are_tagged() {
        let mut form = OrderForm::new(1);
        form.set_take_profit(Some(Decimal::ZERO));
        assert_eq!(form.params().take_profit, Some(Decimal::ZERO));
        form.set_take_profit(None);
        assert_eq!(form.params().take_profit, None);
    }

    #[test]
    fn test_transfer_amount_input() {
        assert_eq!(TransferAmount::from_input(dec!(12.9)).value(), dec!(12));
        assert_eq!(TransferAmount::from_input(dec!(-3)).value(), Decimal::ZERO);

        let amount = TransferAmount::default().increment(dec!(10)).increment(dec!(1));
        assert_eq!(amount.value(), dec!(11));
        assert_eq!(amount.increment(dec!(-50)).value(), Decimal::ZERO);
    }
}
