// Serde support for fixed-width byte newtypes as 0x-prefixed hex strings.

macro_rules! impl_hex_serde {
    ($ty:ident, $len:expr) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = <String as serde::Deserialize>::deserialize(deserializer)?;
                $crate::hex_serde::parse_fixed::<$len>(&text)
                    .map($ty)
                    .map_err(serde::de::Error::custom)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::hex_serde::parse_fixed::<$len>(s).map($ty)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(0x{})", stringify!($ty), hex::encode(self.0))
            }
        }
    };
}

pub(crate) use impl_hex_serde;

pub(crate) fn parse_fixed<const N: usize>(text: &str) -> Result<[u8; N], hex::FromHexError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}
