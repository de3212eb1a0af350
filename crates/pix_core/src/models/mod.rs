pub mod establishment;
pub mod pix;
