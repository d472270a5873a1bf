pub mod party_i;
pub mod state_machine;
pub mod utilities;
pub mod vss;

#[cfg(any(test, feature = "dev"))]
pub mod test;
