//! Multi-step checkout flow.
//!
//! Three ordered steps over one shared form: identity, address, payment.
//! Moving forward validates only the current step's fields; moving back
//! never validates; the terminal submission validates the whole schema and
//! hands the order to an [`OrderGateway`].
//!
//! Card details never leave the form: the simulated payment accepts the
//! order without them, so the [`Order`] carries contact and shipping data
//! only.

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use velora_core::{OrderId, Price};

use crate::cart::{CartLine, CartStore};
use crate::error::ApiError;
use crate::forms::schemas::{self, checkout_fields};
use crate::forms::{FieldName, Form};

/// The checkout steps, in order. `Submitted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    Identity,
    Address,
    Payment,
    Submitted,
}

impl CheckoutStep {
    /// The form fields this step owns.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldName] {
        match self {
            Self::Identity => checkout_fields::IDENTITY,
            Self::Address => checkout_fields::ADDRESS,
            Self::Payment => checkout_fields::PAYMENT,
            Self::Submitted => &[],
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Identity => Some(Self::Address),
            Self::Address => Some(Self::Payment),
            // Payment advances only through submission.
            Self::Payment | Self::Submitted => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::Identity | Self::Submitted => None,
            Self::Address => Some(Self::Identity),
            Self::Payment => Some(Self::Address),
        }
    }
}

/// Contact details collected on the identity step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Shipping details collected on the address step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingDetails {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

/// An order ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
    pub contact: ContactDetails,
    pub shipping: ShippingDetails,
}

/// Confirmation returned by the order collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
}

/// The external order-processing collaborator.
///
/// Confirmation-number generation belongs to the gateway, not the flow.
pub trait OrderGateway {
    /// Submit an order, returning its confirmation.
    fn submit(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<OrderConfirmation, ApiError>> + Send;
}

/// Stand-in gateway for the simulated checkout: accepts every order and
/// issues a UUID reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedOrderGateway;

impl OrderGateway for SimulatedOrderGateway {
    async fn submit(&self, order: &Order) -> Result<OrderConfirmation, ApiError> {
        tracing::info!(
            lines = order.lines.len(),
            subtotal = %order.subtotal,
            "order accepted (simulated)"
        );
        Ok(OrderConfirmation {
            order_id: OrderId::new(Uuid::new_v4().to_string()),
        })
    }
}

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Submission attempted from a step other than payment.
    #[error("checkout is not at the payment step")]
    WrongStep,

    /// Full-schema validation failed; field errors are on the form.
    #[error("checkout form is invalid")]
    Invalid,

    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order gateway rejected the submission.
    #[error(transparent)]
    Submission(#[from] ApiError),
}

/// Orchestrates the three checkout steps over a single form.
pub struct CheckoutFlow {
    form: Form,
    step: CheckoutStep,
}

impl CheckoutFlow {
    /// Start a checkout at the identity step with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: Form::new(schemas::checkout(), []),
            step: CheckoutStep::Identity,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The underlying form, for reading values and errors.
    #[must_use]
    pub const fn form(&self) -> &Form {
        &self.form
    }

    /// The underlying form, for forwarding input events.
    pub const fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Try to move to the next step.
    ///
    /// Permitted only when the current step's own fields validate; on
    /// failure the step is unchanged and those fields' errors are populated.
    /// Other steps' errors are neither validated nor cleared. Returns
    /// whether the step advanced.
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.step.next() else {
            return false;
        };

        if !self.form.validate_subset(self.step.fields()) {
            return false;
        }

        self.step = next;
        true
    }

    /// Move to the previous step. Always permitted, never validates.
    pub fn back(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
    }

    /// Submit the order from the payment step.
    ///
    /// Validates the full schema (all steps share the form), rejects an
    /// empty cart, then hands the order to the gateway. Only a successful
    /// submission clears the cart and moves to `Submitted`; any failure
    /// leaves the step, the form values, and the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] describing why the order was not placed.
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        gateway: &impl OrderGateway,
        cart: &CartStore,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep);
        }

        if !self.form.submit_validate() {
            return Err(CheckoutError::Invalid);
        }

        let snapshot = cart.snapshot();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = Order {
            lines: snapshot.lines,
            subtotal: snapshot.subtotal,
            contact: ContactDetails {
                first_name: self.form.value("first_name").to_owned(),
                last_name: self.form.value("last_name").to_owned(),
                email: self.form.value("email").to_owned(),
                phone: self.form.value("phone").to_owned(),
            },
            shipping: ShippingDetails {
                street: self.form.value("street").to_owned(),
                city: self.form.value("city").to_owned(),
                postal_code: self.form.value("postal_code").to_owned(),
            },
        };

        let confirmation = gateway.submit(&order).await?;

        cart.clear();
        self.step = CheckoutStep::Submitted;
        Ok(confirmation)
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;
    use velora_core::ProductId;

    use crate::catalog::Product;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::new(Decimal::from(price)).expect("price"),
            stock: 5,
            image_url: None,
            images: Vec::new(),
            category: "Rings".to_owned(),
        }
    }

    fn stocked_cart() -> CartStore {
        let cart = CartStore::new();
        cart.add_silent(&product("ring", 2500), 2);
        cart
    }

    fn fill_identity(flow: &mut CheckoutFlow) {
        let form = flow.form_mut();
        form.set_value("first_name", "Ada");
        form.set_value("last_name", "Lovelace");
        form.set_value("email", "ada@velora.example");
        form.set_value("phone", "05321234567");
    }

    fn fill_address(flow: &mut CheckoutFlow) {
        let form = flow.form_mut();
        form.set_value("street", "12 Long Street Name");
        form.set_value("city", "Istanbul");
        form.set_value("postal_code", "34000");
    }

    fn fill_payment(flow: &mut CheckoutFlow) {
        let form = flow.form_mut();
        form.set_value("card_holder", "Ada Lovelace");
        form.set_value("card_number", "4111111111111111");
        form.set_value("expiry_date", "09/27");
        form.set_value("cvv", "123");
    }

    /// Gateway that refuses every order.
    struct RejectingGateway;

    impl OrderGateway for RejectingGateway {
        async fn submit(&self, _order: &Order) -> Result<OrderConfirmation, ApiError> {
            Err(ApiError::Backend {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "Order service is down".to_owned(),
            })
        }
    }

    #[test]
    fn test_advance_blocked_by_invalid_step() {
        let mut flow = CheckoutFlow::new();

        assert!(!flow.advance());
        assert_eq!(flow.step(), CheckoutStep::Identity);
        assert!(flow.form().error("first_name").is_some());
    }

    #[test]
    fn test_advance_validates_current_step_only() {
        let mut flow = CheckoutFlow::new();
        fill_identity(&mut flow);

        // Address and payment fields are still empty, but the identity gate
        // only checks its own fields.
        assert!(flow.advance());
        assert_eq!(flow.step(), CheckoutStep::Address);
        assert!(flow.form().error("street").is_none());
    }

    #[test]
    fn test_back_never_validates() {
        let mut flow = CheckoutFlow::new();
        fill_identity(&mut flow);
        assert!(flow.advance());

        // Break an identity field, then walk back and forward again.
        flow.form_mut().set_value("email", "");
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Identity);

        assert!(!flow.advance());
        assert!(flow.form().error("email").is_some());
    }

    #[test]
    fn test_back_is_noop_at_first_step() {
        let mut flow = CheckoutFlow::new();
        flow.back();
        assert_eq!(flow.step(), CheckoutStep::Identity);
    }

    #[tokio::test]
    async fn test_submit_requires_payment_step() {
        let mut flow = CheckoutFlow::new();
        let cart = stocked_cart();

        let result = flow.submit(&SimulatedOrderGateway, &cart).await;
        assert!(matches!(result, Err(CheckoutError::WrongStep)));
    }

    #[tokio::test]
    async fn test_submit_validates_full_schema() {
        let mut flow = CheckoutFlow::new();
        let cart = stocked_cart();

        fill_identity(&mut flow);
        assert!(flow.advance());
        fill_address(&mut flow);
        assert!(flow.advance());
        // Payment fields left empty.

        let result = flow.submit(&SimulatedOrderGateway, &cart).await;
        assert!(matches!(result, Err(CheckoutError::Invalid)));
        assert_eq!(flow.step(), CheckoutStep::Payment);
        assert!(flow.form().error("card_number").is_some());
        assert!(!cart.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_cart() {
        let mut flow = CheckoutFlow::new();
        fill_identity(&mut flow);
        assert!(flow.advance());
        fill_address(&mut flow);
        assert!(flow.advance());
        fill_payment(&mut flow);

        let empty = CartStore::new();
        let result = flow.submit(&SimulatedOrderGateway, &empty).await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
        assert_eq!(flow.step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_successful_submit_clears_cart() {
        let mut flow = CheckoutFlow::new();
        let cart = stocked_cart();

        fill_identity(&mut flow);
        assert!(flow.advance());
        fill_address(&mut flow);
        assert!(flow.advance());
        fill_payment(&mut flow);

        let confirmation = flow
            .submit(&SimulatedOrderGateway, &cart)
            .await
            .expect("order placed");

        assert!(!confirmation.order_id.as_str().is_empty());
        assert_eq!(flow.step(), CheckoutStep::Submitted);
        assert!(cart.snapshot().is_empty());

        // Terminal: no further advancing.
        assert!(!flow.advance());
    }

    #[tokio::test]
    async fn test_gateway_failure_preserves_state() {
        let mut flow = CheckoutFlow::new();
        let cart = stocked_cart();

        fill_identity(&mut flow);
        assert!(flow.advance());
        fill_address(&mut flow);
        assert!(flow.advance());
        fill_payment(&mut flow);

        let result = flow.submit(&RejectingGateway, &cart).await;

        let err = match result {
            Err(CheckoutError::Submission(api)) => api,
            other => panic!("expected submission error, got {other:?}"),
        };
        assert_eq!(err.user_message(), "Order service is down");

        // Values, step, and cart survive for a retry.
        assert_eq!(flow.step(), CheckoutStep::Payment);
        assert_eq!(flow.form().value("email"), "ada@velora.example");
        assert!(!cart.snapshot().is_empty());
    }
}
