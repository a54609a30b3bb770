//! Serde helpers for chain JSON-RPC quantities.
//!
//! Integers travel as `0x`-prefixed hex strings (`"0x0"`, `"0x2540be400"`).
//! Deserialization also accepts plain JSON numbers, which some services emit
//! for small values such as out-point indices.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Hex(String),
    Number(u64),
}

fn parse_quantity(q: Quantity) -> Result<u64, String> {
    match q {
        Quantity::Number(n) => Ok(n),
        Quantity::Hex(s) => {
            let digits = s
                .strip_prefix("0x")
                .ok_or_else(|| format!("quantity {s:?} is missing the 0x prefix"))?;
            if digits.is_empty() {
                return Err(format!("quantity {s:?} has no digits"));
            }
            u64::from_str_radix(digits, 16).map_err(|e| format!("invalid quantity {s:?}: {e}"))
        }
    }
}

pub mod u32_hex {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let raw = parse_quantity(Quantity::deserialize(deserializer)?)
            .map_err(serde::de::Error::custom)?;
        u32::try_from(raw).map_err(|_| serde::de::Error::custom(format!("{raw} overflows u32")))
    }
}

pub mod u64_hex {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        parse_quantity(Quantity::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super::u32_hex")]
        index: u32,
        #[serde(with = "super::u64_hex")]
        capacity: u64,
    }

    #[test]
    fn quantities_serialize_as_prefixed_hex() {
        let w = Wrapper {
            index: 0,
            capacity: 10_000_000_000,
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"index":"0x0","capacity":"0x2540be400"}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), w);
    }

    #[test]
    fn plain_numbers_are_accepted() {
        let w: Wrapper = serde_json::from_str(r#"{"index":3,"capacity":"0x1"}"#).unwrap();
        assert_eq!(w.index, 3);
        assert_eq!(w.capacity, 1);
    }

    #[test]
    fn malformed_quantities_are_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"index":"12","capacity":"0x1"}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"index":"0x","capacity":"0x1"}"#).is_err());
        assert!(
            serde_json::from_str::<Wrapper>(r#"{"index":"0x100000000","capacity":"0x1"}"#).is_err()
        );
    }
}
