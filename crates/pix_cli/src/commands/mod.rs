pub mod generate;
pub mod rebuild;
pub mod verify;
