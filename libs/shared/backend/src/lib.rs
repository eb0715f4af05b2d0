pub mod clinic;
