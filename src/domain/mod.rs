//! Domain model: cart items, currencies, payment status, and the ports the
//! view-models use to reach the network.

pub mod cart;
pub mod currency;
pub mod payment;
pub mod ports;
