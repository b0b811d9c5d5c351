pub mod sign;
pub mod verify;
