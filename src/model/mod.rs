pub mod notify;
pub mod order;
pub mod params;
pub mod pay;
pub mod refund;
pub mod response;
pub mod trade;
