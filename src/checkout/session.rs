use crate::backend::PaymentBackend;
use crate::checkout::view::CheckoutView;
use crate::domain::checkout::{CardData, CheckoutState, CheckoutStep, PaymentMethod, PixData};
use crate::domain::money::checkout_total_cents;
use crate::domain::product::Product;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

type PixTask = Arc<StdMutex<Option<JoinHandle<()>>>>;

pub const INVALID_CARD_MESSAGE: &str = "Dados do cartão inválidos";
pub const FALLBACK_ERROR_MESSAGE: &str = "Erro ao processar pagamento.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayOutcome {
    /// Pay action not available: drawer closed, busy, CEP incomplete or already paid.
    Blocked,
    Rejected(String),
    AwaitingPix { order_id: String },
    Approved { order_id: String },
    /// The drawer was closed or reopened while the backend call was in flight.
    Abandoned,
}

struct SessionInner {
    product: Option<Product>,
    is_open: bool,
    state: CheckoutState,
    error: String,
    busy: bool,
    generation: u64,
}

impl SessionInner {
    /// Invalidates in-flight work. A card payment still waiting on the
    /// backend loses the step, so PROCESSING never outlives its request.
    fn bump_generation(&mut self) {
        self.generation += 1;
        if self.state.step == CheckoutStep::Processing {
            self.state.step = CheckoutStep::Shipping;
        }
    }

    fn can_pay(&self) -> bool {
        self.is_open
            && self.product.is_some()
            && !self.busy
            && self.state.cep_complete()
            && matches!(self.state.step, CheckoutStep::Shipping | CheckoutStep::Payment)
            && (self.state.payment_method == PaymentMethod::CreditCard || self.state.pix_data.is_none())
    }

    fn total_cents(&self) -> i64 {
        let price = self.product.as_ref().map(|p| p.price_cents).unwrap_or(0);
        checkout_total_cents(price, self.state.shipping_cost_cents)
    }

    fn fail(&mut self, message: String) -> PayOutcome {
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        self.error = message.clone();
        self.busy = false;
        PayOutcome::Rejected(message)
    }
}

/// The checkout drawer's state machine: SHIPPING -> PAYMENT (Pix) -> SUCCESS,
/// or SHIPPING -> PROCESSING (card) -> SUCCESS.
pub struct CheckoutSession {
    backend: Arc<dyn PaymentBackend>,
    pix_confirm_delay: Duration,
    inner: Arc<Mutex<SessionInner>>,
    // Kept outside the async lock so Drop can always reach it.
    pix_task: PixTask,
}

impl CheckoutSession {
    pub fn new(backend: Arc<dyn PaymentBackend>, pix_confirm_delay: Duration) -> Self {
        Self {
            backend,
            pix_confirm_delay,
            inner: Arc::new(Mutex::new(SessionInner {
                product: None,
                is_open: false,
                state: CheckoutState::default(),
                error: String::new(),
                busy: false,
                generation: 0,
            })),
            pix_task: Arc::new(StdMutex::new(None)),
        }
    }

    fn cancel_pix_confirmation(&self) {
        let mut slot = self.pix_task.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(task) = slot.take() {
            task.abort();
            tracing::debug!("pix confirmation cancelled");
        }
    }

    fn invalidate(&self, inner: &mut SessionInner) {
        inner.bump_generation();
        self.cancel_pix_confirmation();
    }

    pub async fn open(&self, product: Product) {
        let mut inner = self.inner.lock().await;
        self.invalidate(&mut inner);
        inner.product = Some(product);
        inner.is_open = true;
        inner.state.reopen();
        inner.error.clear();
        inner.busy = false;
        tracing::info!(generation = inner.generation, "checkout drawer opened");
    }

    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        self.invalidate(&mut inner);
        inner.is_open = false;
        inner.busy = false;
        tracing::info!(step = ?inner.state.step, "checkout drawer closed");
    }

    /// Leaves a finished checkout and returns to the feed.
    pub async fn reset_to_feed(&self) {
        let mut inner = self.inner.lock().await;
        self.invalidate(&mut inner);
        inner.is_open = false;
        inner.busy = false;
        inner.product = None;
    }

    pub async fn set_cep(&self, cep: &str) {
        self.inner.lock().await.state.cep = cep.to_string();
    }

    pub async fn set_card_data(&self, card: CardData) {
        self.inner.lock().await.state.card_data = card;
    }

    /// Ignored while a backend call is in flight.
    pub async fn set_payment_method(&self, method: PaymentMethod) {
        let mut inner = self.inner.lock().await;
        if inner.state.payment_method == method {
            return;
        }
        if inner.busy {
            tracing::debug!(?method, "payment method change ignored while busy");
            return;
        }
        if inner.state.step != CheckoutStep::Success {
            self.invalidate(&mut inner);
            inner.state.pix_data = None;
            if inner.state.step == CheckoutStep::Payment {
                inner.state.step = CheckoutStep::Shipping;
            }
        }
        inner.state.payment_method = method;
    }

    /// CEP field lost focus: look up shipping once the code is complete.
    pub async fn commit_cep(&self) {
        let cep = {
            let mut inner = self.inner.lock().await;
            if !inner.state.cep_complete() {
                return;
            }
            inner.busy = true;
            inner.state.cep.clone()
        };

        let result = self.backend.calculate_shipping(&cep).await;

        let mut inner = self.inner.lock().await;
        inner.busy = false;
        match result {
            Ok(cost) if inner.state.cep == cep => {
                tracing::debug!(cost, "shipping quoted");
                inner.state.shipping_cost_cents = cost;
            }
            Ok(_) => tracing::debug!("shipping quote discarded, CEP changed"),
            Err(e) => inner.error = e.to_string(),
        }
    }

    pub async fn pay(&self) -> PayOutcome {
        let (method, card, amount_cents, generation, step_before) = {
            let mut inner = self.inner.lock().await;
            if !inner.can_pay() {
                return PayOutcome::Blocked;
            }
            inner.error.clear();
            inner.busy = true;
            (
                inner.state.payment_method,
                inner.state.card_data.clone(),
                inner.total_cents(),
                inner.generation,
                inner.state.step,
            )
        };

        match method {
            PaymentMethod::Pix => self.pay_with_pix(generation).await,
            PaymentMethod::CreditCard => self.pay_with_card(card, amount_cents, generation, step_before).await,
        }
    }

    async fn pay_with_pix(&self, generation: u64) -> PayOutcome {
        let result = self.backend.generate_pix().await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            return PayOutcome::Abandoned;
        }
        let pix = match result {
            Ok(pix) => pix,
            Err(e) => return inner.fail(e.to_string()),
        };

        inner.state.pix_data = Some(PixData {
            code: pix.code,
            expires_at: pix.expires_at,
        });
        inner.state.step = CheckoutStep::Payment;
        inner.busy = false;

        let shared = Arc::clone(&self.inner);
        let delay = self.pix_confirm_delay;
        let order_id = pix.order_id.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = shared.lock().await;
            if inner.generation != generation {
                return;
            }
            inner.state.step = CheckoutStep::Success;
            inner.state.order_id = Some(order_id);
            tracing::info!(order_id = ?inner.state.order_id, "pix payment confirmed");
        });
        // Stored while the session lock is held, so a concurrent close sees it.
        if let Some(previous) = self
            .pix_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .replace(task)
        {
            previous.abort();
        }

        tracing::info!(order_id = %pix.order_id, "pix code issued");
        PayOutcome::AwaitingPix { order_id: pix.order_id }
    }

    async fn pay_with_card(
        &self,
        card: CardData,
        amount_cents: i64,
        generation: u64,
        step_before: CheckoutStep,
    ) -> PayOutcome {
        if !card.is_plausible() {
            return self.inner.lock().await.fail(INVALID_CARD_MESSAGE.to_string());
        }

        {
            let mut inner = self.inner.lock().await;
            if inner.generation != generation {
                return PayOutcome::Abandoned;
            }
            inner.state.step = CheckoutStep::Processing;
        }
        let result = self.backend.process_card_payment(&card, amount_cents).await;

        // Whoever bumped the generation already released busy and the step.
        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            if let Ok(receipt) = &result {
                tracing::warn!(order_id = %receipt.order_id, "card approved after drawer was left");
            }
            return PayOutcome::Abandoned;
        }
        match result {
            Ok(receipt) => {
                inner.state.order_id = Some(receipt.order_id.clone());
                inner.state.step = CheckoutStep::Success;
                inner.busy = false;
                tracing::info!(order_id = %receipt.order_id, amount_cents, "card payment approved");
                PayOutcome::Approved { order_id: receipt.order_id }
            }
            Err(e) => {
                inner.state.step = step_before;
                inner.fail(e.to_string())
            }
        }
    }

    pub async fn can_pay(&self) -> bool {
        self.inner.lock().await.can_pay()
    }

    pub async fn state(&self) -> CheckoutState {
        self.inner.lock().await.state.clone()
    }

    pub async fn error(&self) -> Option<String> {
        let inner = self.inner.lock().await;
        (!inner.error.is_empty()).then(|| inner.error.clone())
    }

    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.busy
    }

    pub async fn has_pending_pix_confirmation(&self) -> bool {
        self.pix_task
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub async fn view(&self) -> CheckoutView {
        let inner = self.inner.lock().await;
        CheckoutView::build(
            inner.product.as_ref(),
            &inner.state,
            inner.is_open,
            inner.busy,
            &inner.error,
            inner.can_pay(),
        )
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        self.cancel_pix_confirmation();
    }
}
