//! Calldata for the vault contract's fixed ABI.
//!
//! The contract exposes exactly three entry points:
//!
//! - `deposit() payable`
//! - `withdraw(uint256 amount)`
//! - `getBalance() view returns (uint256)`
//!
//! Base-unit quantities are carried as `u128`; anything wider coming back
//! from the chain is rejected instead of truncated.

/// `keccak256("deposit()")[..4]`
pub const DEPOSIT_SELECTOR: [u8; 4] = [0xd0, 0xe3, 0x0d, 0xb0];
/// `keccak256("withdraw(uint256)")[..4]`
pub const WITHDRAW_SELECTOR: [u8; 4] = [0x2e, 0x1a, 0x7d, 0x4d];
/// `keccak256("getBalance()")[..4]`
pub const GET_BALANCE_SELECTOR: [u8; 4] = [0x12, 0x06, 0x5f, 0xe0];

/// Hex characters in one 32-byte ABI word.
const WORD_HEX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("hex value is missing the 0x prefix: {0:?}")]
    MissingPrefix(String),

    #[error("invalid hex digits: {0:?}")]
    InvalidHex(String),

    #[error("expected a 32-byte word, got {0} hex characters")]
    WrongLength(usize),

    #[error("value does not fit in 128 bits")]
    Overflow,
}

/// A call against the vault contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultCall {
    Deposit,
    Withdraw { amount: u128 },
    GetBalance,
}

impl VaultCall {
    /// Encode as `0x`-prefixed calldata.
    pub fn encode(&self) -> String {
        let selector = match self {
            VaultCall::Deposit => DEPOSIT_SELECTOR,
            VaultCall::Withdraw { .. } => WITHDRAW_SELECTOR,
            VaultCall::GetBalance => GET_BALANCE_SELECTOR,
        };
        let mut data = String::with_capacity(2 + 8 + WORD_HEX_LEN);
        data.push_str("0x");
        for byte in selector {
            data.push_str(&format!("{byte:02x}"));
        }
        if let VaultCall::Withdraw { amount } = self {
            data.push_str(&format!("{amount:064x}"));
        }
        data
    }
}

/// Encode a JSON-RPC quantity (`0x` + minimal hex, `0x0` for zero).
pub fn encode_quantity(value: u128) -> String {
    format!("{value:#x}")
}

/// Decode a JSON-RPC quantity such as a transaction value or block number.
pub fn decode_quantity(hex: &str) -> Result<u128, AbiError> {
    let digits = strip_prefix(hex)?;
    if digits.is_empty() {
        return Err(AbiError::InvalidHex(hex.to_string()));
    }
    let digits = digits.trim_start_matches('0');
    if digits.len() > 32 {
        return Err(AbiError::Overflow);
    }
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|_| AbiError::InvalidHex(hex.to_string()))
}

/// Decode the single `uint256` word returned by `getBalance()`.
pub fn decode_uint256_word(hex: &str) -> Result<u128, AbiError> {
    let digits = strip_prefix(hex)?;
    if digits.len() != WORD_HEX_LEN {
        return Err(AbiError::WrongLength(digits.len()));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AbiError::InvalidHex(hex.to_string()));
    }
    let (high, low) = digits.split_at(WORD_HEX_LEN / 2);
    if high.chars().any(|c| c != '0') {
        return Err(AbiError::Overflow);
    }
    u128::from_str_radix(low, 16).map_err(|_| AbiError::InvalidHex(hex.to_string()))
}

fn strip_prefix(hex: &str) -> Result<&str, AbiError> {
    hex.strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| AbiError::MissingPrefix(hex.to_string()))
}
