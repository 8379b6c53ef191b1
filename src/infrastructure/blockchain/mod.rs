//! Solana RPC and wallet access

pub mod rpc_client;
pub mod wallet;

pub use rpc_client::{RpcSettings, SolanaRpcClient};
pub use wallet::KeypairWallet;
