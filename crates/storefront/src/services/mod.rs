//! Storefront services.
//!
//! Each service borrows the application store and turns one user-facing
//! operation into validated dispatches.
//!
//! # Services
//!
//! - `auth` - Mock login, registration and logout
//! - `cart` - Cart edits with the login and catalog checks
//! - `checkout` - Simulated payment

pub mod auth;
pub mod cart;
pub mod checkout;
mod validation;

pub use auth::{AuthError, AuthService, LoginForm, RegisterForm};
pub use cart::CartService;
pub use checkout::{
    CheckoutError, CheckoutForm, CheckoutService, OrderConfirmation, OrderLine, PaymentMethod,
};
pub use validation::{FieldError, ValidationErrors};
