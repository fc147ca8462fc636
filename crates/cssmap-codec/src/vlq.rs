//! Base64 VLQ encoding of mapping segments
//!
//! Each value is stored sign-in-lowest-bit, then split into 5-bit groups,
//! least significant first. Bit 6 of every digit but the last is set as a
//! continuation flag.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

fn digit_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

/// Append the VLQ encoding of `value` to `out`
pub fn encode(value: i64, out: &mut String) {
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        value.unsigned_abs() << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(char::from(ALPHABET[digit as usize]));
        if vlq == 0 {
            break;
        }
    }
}

/// Decode every value of one comma-free segment
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, String> {
    let mut values = Vec::with_capacity(5);
    let mut accumulated: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for byte in segment.bytes() {
        let digit = digit_value(byte)
            .ok_or_else(|| format!("invalid base64 character {:?}", char::from(byte)))?;
        if shift > 60 {
            return Err("value does not fit in 64 bits".to_string());
        }
        accumulated |= (digit & VLQ_BASE_MASK) << shift;
        pending = true;

        if digit & VLQ_CONTINUATION_BIT != 0 {
            shift += VLQ_BASE_SHIFT;
            continue;
        }

        let magnitude = (accumulated >> 1) as i64;
        values.push(if accumulated & 1 == 1 {
            -magnitude
        } else {
            magnitude
        });
        accumulated = 0;
        shift = 0;
        pending = false;
    }

    if pending {
        return Err("segment ends inside a value".to_string());
    }
    Ok(values)
}
