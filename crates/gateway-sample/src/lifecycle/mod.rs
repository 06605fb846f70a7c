//! # System Lifecycle
//!
//! Starting, wiring and stopping the sample gateway.
//!
//! ## The GatewaySystem Pattern
//!
//! [`GatewaySystem::start`] creates one store actor per configured resource type,
//! spawns each on its own task, registers the clients in a
//! [`Registry`](gateway_framework::Registry) and wraps it in a
//! [`Gateway`](gateway_framework::Gateway).
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the gateway and every client** - closes the sender side of each channel
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Actors log their final size** and return
//! 4. **Await completion** - a task that panicked is reported as [`SystemError::Join`]
//!
//! Any clone of the [`Gateway`](gateway_framework::Gateway) still alive elsewhere
//! keeps its stores running, so drop those before calling
//! [`GatewaySystem::shutdown`].

pub mod gateway_system;

pub use gateway_system::*;
