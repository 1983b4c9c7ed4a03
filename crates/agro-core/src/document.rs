//! # Document Validation
//!
//! CPF/CNPJ checksum validation for producer tax IDs.
//!
//! ## Check Digit Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CPF  (11 digits)   d0 d1 … d8 │ c1 c2                                  │
//! │  CNPJ (14 digits)   d0 d1 … d11│ c1 c2                                  │
//! │                                                                         │
//! │  For each check digit:                                                  │
//! │    sum = Σ digit[i] × weight[i]                                         │
//! │    r   = sum mod 11                                                     │
//! │    c   = 0 if r < 2 else 11 − r                                         │
//! │                                                                         │
//! │  CPF weights:   c1 → 10 … 2        c2 → 11 … 2                          │
//! │  CNPJ weights:  c1 → 5 4 3 2 9 8 7 6 5 4 3 2                            │
//! │                 c2 → 6 5 4 3 2 9 8 7 6 5 4 3 2                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Strings made of one repeated digit ("00000000000") satisfy the arithmetic
//! but are never valid documents.
//!
//! ## Usage
//! ```rust
//! use agro_core::document::{classify_document, is_valid_document, DocumentKind};
//!
//! assert!(is_valid_document("529.982.247-25"));
//! assert_eq!(classify_document("11.222.333/0001-81"), Some(DocumentKind::Cnpj));
//! assert!(!is_valid_document("111.111.111-11"));
//! ```

use serde::{Deserialize, Serialize};

const CPF_LENGTH: usize = 11;
const CNPJ_LENGTH: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Which kind of taxpayer ID a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Individual taxpayer (11 digits).
    Cpf,
    /// Company taxpayer (14 digits).
    Cnpj,
}

/// Strips every non-digit character.
///
/// Producers are stored and looked up by this normalized form, so
/// "529.982.247-25" and "52998224725" are the same document.
pub fn normalize_document(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Returns `true` if `raw` is a valid CPF or CNPJ.
pub fn is_valid_document(raw: &str) -> bool {
    classify_document(raw).is_some()
}

/// Classifies a valid document; `None` if it fails format or checksum.
pub fn classify_document(raw: &str) -> Option<DocumentKind> {
    let digits = to_digits(&normalize_document(raw));

    if is_repeated_digit(&digits) {
        return None;
    }

    match digits.len() {
        CPF_LENGTH if is_valid_cpf(&digits) => Some(DocumentKind::Cpf),
        CNPJ_LENGTH if is_valid_cnpj(&digits) => Some(DocumentKind::Cnpj),
        _ => None,
    }
}

// =============================================================================
// Checksums
// =============================================================================

fn is_valid_cpf(digits: &[u32]) -> bool {
    let first_weights: Vec<u32> = (2..=10).rev().collect();
    let second_weights: Vec<u32> = (2..=11).rev().collect();

    check_digit(&digits[..9], &first_weights) == digits[9]
        && check_digit(&digits[..10], &second_weights) == digits[10]
}

fn is_valid_cnpj(digits: &[u32]) -> bool {
    check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS) == digits[12]
        && check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS) == digits[13]
}

/// Mod-11 check digit shared by CPF and CNPJ.
fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;

    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

fn to_digits(normalized: &str) -> Vec<u32> {
    normalized.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn is_repeated_digit(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

// =============================================================================
// Unit Tests
// =============================================================================
