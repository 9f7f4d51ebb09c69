//! Ethereum address validation.
//!
//! Accepts the plain hex form (with or without `0x`, EIP-55 checked when the
//! input is mixed case) and the ICAP `XE..` form.

use std::str::FromStr;

use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};

use crate::errors::CustomError;

/// Parse `input` into an address, rejecting anything that fails the format or
/// checksum rules.
pub fn parse_address(input: &str) -> Result<Address, CustomError> {
    let invalid = || CustomError::InvalidAddressError(input.to_string());

    if input.starts_with("XE") {
        return parse_icap(input).ok_or_else(invalid);
    }

    let hex_part = input.strip_prefix("0x").unwrap_or(input);
    if hex_part.len() != 40 || !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let address = Address::from_str(hex_part).map_err(|_| invalid())?;

    let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
    if has_upper && has_lower && to_checksum(&address, None)[2..] != *hex_part {
        return Err(invalid());
    }

    Ok(address)
}

fn parse_icap(input: &str) -> Option<Address> {
    let bytes = input.as_bytes();
    if !(34..=35).contains(&bytes.len())
        || !bytes[2..4].iter().all(u8::is_ascii_digit)
        || !bytes[4..].iter().all(u8::is_ascii_alphanumeric)
    {
        return None;
    }

    if input[2..4] != icap_checksum(input) {
        return None;
    }

    let mut value = U256::zero();
    for c in input[4..].chars() {
        let digit = c.to_digit(36)?;
        value = value
            .checked_mul(U256::from(36u8))?
            .checked_add(U256::from(digit))?;
    }
    if value.bits() > 160 {
        return None;
    }

    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    Some(Address::from_slice(&word[12..]))
}

/// IBAN mod-97 check digits: move the country code and a `00` placeholder to
/// the end, expand letters to two-digit numbers, and take `98 - (n mod 97)`.
fn icap_checksum(input: &str) -> String {
    let upper = input.to_ascii_uppercase();
    let rearranged = format!("{}{}00", &upper[4..], &upper[..2]);

    let mut remainder = 0u32;
    for c in rearranged.chars() {
        let expanded = match c.to_digit(36) {
            Some(n) => n,
            None => return String::new(),
        };
        if expanded >= 10 {
            remainder = (remainder * 100 + expanded) % 97;
        } else {
            remainder = (remainder * 10 + expanded) % 97;
        }
    }

    format!("{:02}", 98 - remainder)
}
