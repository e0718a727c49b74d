//! STEMSight event bus and outbound email.
//!
//! - [`EventBus`] is the in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; the API forwards its events to dashboard
//!   WebSocket clients.
//! - [`PlatformEvent`] is the canonical domain event envelope.
//! - [`delivery`] holds external delivery channels (SMTP email for
//!   password resets).

pub mod bus;
pub mod delivery;

pub use bus::{event_types, EntityRef, EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, PasswordResetEmail};
