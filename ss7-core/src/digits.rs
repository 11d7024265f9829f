//! Address-digit codec
//!
//! ISUP and CAMEL address parameters carry phone numbers as packed 4-bit
//! address signals, two per byte, low nibble first. An odd/even indicator in
//! the enclosing parameter header says whether the final high nibble of the
//! last byte is a digit or filler.
//!
//! Signals 0-9 are decimal digits. Signals 10-15 are markers whose meaning
//! depends on call direction: the called-party table assigns 15 to
//! "Stop sending" while the calling-party table leaves it spare. The two
//! tables are kept separate and selected by the caller; the divergence at
//! codes 11-15 follows Q.763 as observed on the wire.

use serde::{Deserialize, Serialize};

/// Which address-signal table applies
///
/// Selected statically by the enclosing parameter (Called Party Number uses
/// `CalledParty`, Calling/Connected/Generic Number use `CallingParty`), never
/// derived from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressContext {
    CalledParty,
    CallingParty,
}

/// Address signal names, called-party variant
const CALLED_SIGNAL_NAMES: [&str; 16] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
    "spare", "spare", "spare", "spare", "spare", "Stop sending",
];

/// Address signal names, calling-party variant
const CALLING_SIGNAL_NAMES: [&str; 16] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9",
    "spare", "spare", "spare", "spare", "spare", "spare",
];

impl AddressContext {
    /// Name of a single address signal (low 4 bits of `signal`)
    pub fn signal_name(self, signal: u8) -> &'static str {
        let idx = (signal & 0x0F) as usize;
        match self {
            AddressContext::CalledParty => CALLED_SIGNAL_NAMES[idx],
            AddressContext::CallingParty => CALLING_SIGNAL_NAMES[idx],
        }
    }

    /// Single-character rendering of an address signal for digit strings
    ///
    /// Decimal signals map to their ASCII digit. The called-party
    /// "Stop sending" signal renders as `S`; spare codes render as `?`.
    pub fn signal_char(self, signal: u8) -> char {
        let signal = signal & 0x0F;
        match signal {
            0..=9 => (b'0' + signal) as char,
            15 if self == AddressContext::CalledParty => 'S',
            _ => '?',
        }
    }
}

/// A decoded sequence of address signals plus the odd/even indication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitString {
    /// Rendered digits (one character per signal)
    pub text: String,
    /// Raw 4-bit signals in order
    pub signals: Vec<u8>,
    /// Whether the enclosing parameter indicated an odd signal count
    pub odd: bool,
}

impl DigitString {
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Unpack packed address signals from `data`
///
/// Each byte yields its low nibble first, then its high nibble. When `odd`
/// is set the final high nibble of the last byte is filler and is not
/// emitted. A zero-length slice yields an empty digit string.
pub fn decode_digits(data: &[u8], odd: bool, ctx: AddressContext) -> DigitString {
    let mut signals = Vec::with_capacity(data.len() * 2);

    for (i, &byte) in data.iter().enumerate() {
        signals.push(byte & 0x0F);
        let last = i + 1 == data.len();
        if !(last && odd) {
            signals.push((byte >> 4) & 0x0F);
        }
    }

    let text = signals.iter().map(|&s| ctx.signal_char(s)).collect();
    DigitString { text, signals, odd }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_count_yields_two_digits_per_byte() {
        let ds = decode_digits(&[0x21, 0x43], false, AddressContext::CalledParty);
        assert_eq!(ds.text, "1234");
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn test_odd_count_drops_final_high_nibble() {
        // "123": last byte carries filler 0 in its high nibble
        let ds = decode_digits(&[0x21, 0x03], true, AddressContext::CalledParty);
        assert_eq!(ds.text, "123");
        assert_eq!(ds.len(), 3);
        // The last emitted signal is the LOW nibble of the last byte
        assert_eq!(*ds.signals.last().unwrap(), 0x03);
    }

    #[test]
    fn test_empty_input_is_empty_not_error() {
        let ds = decode_digits(&[], false, AddressContext::CallingParty);
        assert!(ds.is_empty());
        assert_eq!(ds.text, "");
    }

    #[test]
    fn test_low_nibble_first_ordering() {
        // 0x04 -> low nibble 4 first, high nibble 0 second
        let ds = decode_digits(&[0x04], false, AddressContext::CalledParty);
        assert_eq!(ds.text, "40");
    }

    // The two signal tables diverge only at codes 11-15. Q.763 assigns
    // "Stop sending" to called-party code 15 but leaves the calling-party
    // code spare; this is a documented protocol quirk, not an inconsistency
    // to unify.
    #[test]
    fn test_called_and_calling_tables_diverge_at_fifteen() {
        for code in 0..=9u8 {
            assert_eq!(
                AddressContext::CalledParty.signal_name(code),
                AddressContext::CallingParty.signal_name(code)
            );
        }
        for code in 10..=14u8 {
            assert_eq!(AddressContext::CalledParty.signal_name(code), "spare");
            assert_eq!(AddressContext::CallingParty.signal_name(code), "spare");
        }
        assert_eq!(AddressContext::CalledParty.signal_name(15), "Stop sending");
        assert_eq!(AddressContext::CallingParty.signal_name(15), "spare");
    }

    #[test]
    fn test_digit_count_property() {
        for len in 1..8usize {
            let data: Vec<u8> = (0..len as u8).map(|i| (i << 4) | i).collect();
            let even = decode_digits(&data, false, AddressContext::CalledParty);
            assert_eq!(even.len(), len * 2);
            let odd = decode_digits(&data, true, AddressContext::CalledParty);
            assert_eq!(odd.len(), len * 2 - 1);
        }
    }
}
