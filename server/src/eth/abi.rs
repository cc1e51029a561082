//! Minimal Solidity ABI codec covering the parameter kinds the FlightSurety
//! contract uses: `address`, `uint*`, `bool` and `string`.
//!
//! Static fixed-size arrays such as `uint8[3]` are encoded inline, so they are
//! decoded as consecutive `Uint` words.

use sha3::{Digest, Keccak256};
use thiserror::Error;

use super::types::{Address, H256, U256};

const WORD: usize = 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AbiError {
    #[error("data too short: needed {needed} bytes, got {got}")]
    ShortData { needed: usize, got: usize },

    #[error("dynamic offset {0} does not fit the payload")]
    InvalidOffset(U256),

    #[error("string is not valid utf-8")]
    InvalidUtf8,

    #[error("expected {expected}, decoded {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },

    #[error("value {0} does not fit in {1}")]
    Overflow(U256, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Address,
    Uint,
    Bool,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    Bool(bool),
    String(String),
}

impl Token {
    fn kind_name(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Bool(_) => "bool",
            Token::String(_) => "string",
        }
    }

    pub fn into_address(self) -> Result<Address, AbiError> {
        match self {
            Token::Address(address) => Ok(address),
            other => Err(AbiError::UnexpectedToken {
                expected: "address",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_uint(self) -> Result<U256, AbiError> {
        match self {
            Token::Uint(value) => Ok(value),
            other => Err(AbiError::UnexpectedToken {
                expected: "uint",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_bool(self) -> Result<bool, AbiError> {
        match self {
            Token::Bool(value) => Ok(value),
            other => Err(AbiError::UnexpectedToken {
                expected: "bool",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Token::String(value) => Ok(value),
            other => Err(AbiError::UnexpectedToken {
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }

    pub fn into_u8(self) -> Result<u8, AbiError> {
        let value = self.into_uint()?;
        if value > U256::from(u8::MAX) {
            return Err(AbiError::Overflow(value, "u8"));
        }
        Ok(value.low_u32() as u8)
    }

    pub fn into_u64(self) -> Result<u64, AbiError> {
        let value = self.into_uint()?;
        if value > U256::from(u64::MAX) {
            return Err(AbiError::Overflow(value, "u64"));
        }
        Ok(value.low_u64())
    }
}

pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Four-byte function selector of a canonical signature such as `fund()`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic 0 of a non-anonymous event.
pub fn event_topic(signature: &str) -> H256 {
    H256::from(keccak256(signature.as_bytes()))
}

pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(encode(tokens));
    data
}

pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let mut head = Vec::with_capacity(tokens.len() * WORD);
    let mut tail = Vec::new();
    let head_len = tokens.len() * WORD;

    for token in tokens {
        match token {
            Token::String(text) => {
                head.extend(uint_word(U256::from(head_len + tail.len())));
                tail.extend(encode_string(text));
            }
            _ => head.extend(encode_static(token)),
        }
    }

    head.extend(tail);
    head
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

fn encode_static(token: &Token) -> [u8; WORD] {
    match token {
        Token::Address(address) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(address.as_bytes());
            word
        }
        Token::Uint(value) => uint_word(*value),
        Token::Bool(flag) => uint_word(U256::from(u8::from(*flag))),
        Token::String(_) => [0u8; WORD],
    }
}

fn encode_string(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let padded_len = bytes.len().div_ceil(WORD) * WORD;
    let mut out = uint_word(U256::from(bytes.len())).to_vec();
    out.extend_from_slice(bytes);
    out.resize(WORD + padded_len, 0);
    out
}

pub fn decode(kinds: &[ParamKind], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    kinds
        .iter()
        .enumerate()
        .map(|(position, kind)| {
            let word = read_word(data, position * WORD)?;
            match kind {
                ParamKind::Address => Ok(Token::Address(Address::from_slice(&word[12..]))),
                ParamKind::Uint => Ok(Token::Uint(U256::from_big_endian(word))),
                ParamKind::Bool => Ok(Token::Bool(word.iter().any(|byte| *byte != 0))),
                ParamKind::String => decode_string(data, U256::from_big_endian(word)),
            }
        })
        .collect()
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let end = offset + WORD;
    data.get(offset..end).ok_or(AbiError::ShortData {
        needed: end,
        got: data.len(),
    })
}

fn decode_string(data: &[u8], offset: U256) -> Result<Token, AbiError> {
    if offset > U256::from(data.len()) {
        return Err(AbiError::InvalidOffset(offset));
    }
    let start = offset.low_u64() as usize;

    let len_word = U256::from_big_endian(read_word(data, start)?);
    if len_word > U256::from(data.len()) {
        return Err(AbiError::InvalidOffset(len_word));
    }
    let len = len_word.low_u64() as usize;

    let body_start = start + WORD;
    let body = data
        .get(body_start..body_start + len)
        .ok_or(AbiError::ShortData {
            needed: body_start + len,
            got: data.len(),
        })?;

    String::from_utf8(body.to_vec())
        .map(Token::String)
        .map_err(|_| AbiError::InvalidUtf8)
}
