// Per-tick motion laws for trucks and customers.

pub mod customers;
pub mod trip;
