pub mod order;
pub mod pay;
pub mod refund;
