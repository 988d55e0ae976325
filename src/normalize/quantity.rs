// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parsing of raw Kubernetes quantity strings into display units.

use snafu::OptionExt;

use crate::types::error::{
    Error, InvalidCoresSnafu, InvalidIntegerSnafu, MissingSuffixSnafu, OverflowSnafu,
};

const NANO_PER_MILLI: u64 = 1_000_000;
const KI_PER_MI: u64 = 1024;
const MILLI_PER_CORE: u64 = 1000;

/// Converts a nanocore quantity (`"250000000n"`) to millicores, rounding to
/// the nearest integer.
pub fn convert_cpu_nano_to_milli(raw: &str) -> Result<u64, Error> {
    let nano = leading_integer(raw, "n")?;
    Ok(div_round(nano, NANO_PER_MILLI))
}

/// Converts a kibibyte quantity (`"1048576Ki"`) to mebibytes, rounding to the
/// nearest integer.
pub fn convert_memory_ki_to_mebi(raw: &str) -> Result<u64, Error> {
    let kibi = leading_integer(raw, "Ki")?;
    Ok(div_round(kibi, KI_PER_MI))
}

/// Converts a decimal number of cores (`"2"`, `"0.5"`) to millicores.
///
/// Digits past the third decimal place are truncated. A value that is already
/// in millicores (`"3920m"`, as in node allocatable) is returned as is.
pub fn convert_cpu_cores_to_milli(raw: &str) -> Result<u64, Error> {
    if let Some(milli) = raw.strip_suffix('m') {
        if !is_digits(milli) {
            return InvalidCoresSnafu { raw }.fail();
        }
        return milli.parse::<u64>().ok().context(OverflowSnafu { raw });
    }

    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (raw, ""),
    };

    if (whole.is_empty() && fraction.is_empty())
        || (!whole.is_empty() && !is_digits(whole))
        || (!fraction.is_empty() && !is_digits(fraction))
    {
        return InvalidCoresSnafu { raw }.fail();
    }

    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().ok().context(OverflowSnafu { raw })?
    };

    let milli_fraction = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0'));

    whole
        .checked_mul(MILLI_PER_CORE)
        .and_then(|m| m.checked_add(milli_fraction))
        .context(OverflowSnafu { raw })
}

/// Extracts the first unsigned decimal number embedded in `s`
/// (`"250m"` -> 250, `"12.5%"` -> 12.5).
pub fn first_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in rest.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
    }

    rest[..end].parse().ok()
}

fn leading_integer(raw: &str, suffix: &'static str) -> Result<u64, Error> {
    // the API server writes a zero quantity without any suffix
    if raw == "0" {
        return Ok(0);
    }

    let digits = raw
        .strip_suffix(suffix)
        .context(MissingSuffixSnafu { raw, suffix })?;

    if !is_digits(digits) {
        return InvalidIntegerSnafu { raw, suffix }.fail();
    }

    digits.parse::<u64>().ok().context(OverflowSnafu { raw })
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Integer division rounding half up.
fn div_round(value: u64, divisor: u64) -> u64 {
    value / divisor + u64::from(value % divisor * 2 >= divisor)
}
