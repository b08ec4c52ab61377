use crate::domain::checkout::{CheckoutState, CheckoutStep, PaymentMethod};
use crate::domain::money::{checkout_total_cents, format_brl};
use crate::domain::product::Product;
use serde::Serialize;

/// What the drawer renders for the current state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckoutView {
    pub is_open: bool,
    pub step: CheckoutStep,
    pub payment_method: PaymentMethod,
    pub product_name: Option<String>,
    pub product_price_label: Option<String>,
    pub shipping_label: Option<String>,
    pub total_cents: i64,
    pub total_label: String,
    pub pay_label: Option<&'static str>,
    pub pay_enabled: bool,
    pub pix_code: Option<String>,
    pub order_id: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
}

impl CheckoutView {
    pub fn build(
        product: Option<&Product>,
        state: &CheckoutState,
        is_open: bool,
        busy: bool,
        error: &str,
        can_pay: bool,
    ) -> Self {
        let price = product.map(|p| p.price_cents).unwrap_or(0);
        let total_cents = checkout_total_cents(price, state.shipping_cost_cents);

        Self {
            is_open,
            step: state.step,
            payment_method: state.payment_method,
            product_name: product.map(|p| p.name.clone()),
            product_price_label: product.map(|p| format_brl(p.price_cents)),
            shipping_label: shipping_label(state.shipping_cost_cents),
            total_cents,
            total_label: format_brl(total_cents),
            pay_label: pay_label(state),
            pay_enabled: can_pay,
            pix_code: state.pix_data.as_ref().map(|p| p.code.clone()),
            order_id: state.order_id.clone(),
            error: (!error.is_empty()).then(|| error.to_string()),
            busy,
        }
    }
}

pub fn shipping_label(cost_cents: i64) -> Option<String> {
    (cost_cents > 0).then(|| format_brl(cost_cents))
}

fn pay_label(state: &CheckoutState) -> Option<&'static str> {
    if state.step == CheckoutStep::Success {
        return None;
    }
    match state.payment_method {
        PaymentMethod::Pix if state.pix_data.is_none() => Some("Gerar Pix"),
        PaymentMethod::Pix => None,
        PaymentMethod::CreditCard => Some("Pagar Agora"),
    }
}
