//! Infrastructure layer - RPC, wallet and Raydium integrations

pub mod blockchain;
pub mod raydium;
