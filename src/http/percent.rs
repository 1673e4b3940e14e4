//! Percent-decoding for request targets.
//!
//! `+` is left alone (it only means space in form bodies), malformed escapes
//! are kept verbatim and invalid UTF-8 is replaced lossily.

use percent_encoding::percent_decode_str;

pub fn decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
