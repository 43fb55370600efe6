use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn load_json_from_file<T, P>(path: P) -> Result<T>
where
    for<'de> T: Deserialize<'de>,
    P: AsRef<Path>,
{
    let data = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&data);
    serde_path_to_error::deserialize(de).map_err(Into::into)
}

pub mod humantime {
    use std::time::Duration;

    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&::humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        struct V;

        impl Visitor<'_> for V {
            type Value = Duration;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a duration")
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Duration, E> {
                ::humantime::parse_duration(v)
                    .map_err(|_e| E::invalid_value(serde::de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(V)
    }
}

/// Values which travel as JSON strings (big integers, heights in headers).
pub mod string {
    use super::*;

    pub fn serialize<S>(value: &dyn std::fmt::Display, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        BorrowedStr::deserialize(deserializer)
            .and_then(|data| T::from_str(&data.0).map_err(D::Error::custom))
    }
}

/// Byte strings as standard base64. A JSON `null` is read as an empty buffer.
pub mod base64 {
    use ::base64::engine::Engine as _;
    use ::base64::prelude::BASE64_STANDARD;

    use super::*;

    pub fn serialize<S, T>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: AsRef<[u8]> + ?Sized,
    {
        serializer.serialize_str(&BASE64_STANDARD.encode(data.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Option::<BorrowedStr<'_>>::deserialize(deserializer)? {
            Some(BorrowedStr(s)) => decode(&s).map_err(Error::custom),
            None => Ok(Vec::new()),
        }
    }

    pub(super) fn decode(s: &str) -> Result<Vec<u8>, ::base64::DecodeError> {
        BASE64_STANDARD.decode(s)
    }
}

pub mod option_base64 {
    use super::*;

    pub fn serialize<S>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        struct Helper<'a>(#[serde(with = "super::base64")] &'a Vec<u8>);

        data.as_ref().map(Helper).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Option::<BorrowedStr<'_>>::deserialize(deserializer)? {
            Some(BorrowedStr(s)) => super::base64::decode(&s).map(Some).map_err(Error::custom),
            None => Ok(None),
        }
    }
}

/// A list of base64 byte strings. A JSON `null` is read as an empty list.
pub mod base64_list {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    #[repr(transparent)]
    struct Item(#[serde(with = "super::base64")] Vec<u8>);

    pub fn serialize<S>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        #[derive(Serialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        struct ItemRef<'a>(#[serde(with = "super::base64")] &'a Vec<u8>);

        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&ItemRef(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Option::<Vec<Item>>::deserialize(deserializer)?;
        Ok(items
            .unwrap_or_default()
            .into_iter()
            .map(|Item(bytes)| bytes)
            .collect())
    }
}

/// Byte strings as upper-case hex, the way tendermint encodes hashes.
/// Reads a JSON `null` as `T::default()`. Go encodes nil slices and maps as `null`.
pub mod null_default {
    use super::*;

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
    }
}

pub mod hex_upper {
    use super::*;

    pub fn serialize<S, T>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: AsRef<[u8]> + ?Sized,
    {
        serializer.serialize_str(&hex::encode_upper(data.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Option::<BorrowedStr<'_>>::deserialize(deserializer)? {
            Some(BorrowedStr(s)) => hex::decode(s.as_ref()).map_err(Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Deserialize)]
#[repr(transparent)]
pub struct BorrowedStr<'a>(#[serde(borrow)] pub Cow<'a, str>);

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::base64")]
        data: Vec<u8>,
        #[serde(with = "super::hex_upper")]
        hash: Vec<u8>,
        #[serde(with = "super::string")]
        amount: u128,
        #[serde(with = "super::humantime")]
        timeout: Duration,
        #[serde(default, with = "super::option_base64")]
        signature: Option<Vec<u8>>,
        #[serde(default, with = "super::base64_list")]
        nodes: Vec<Vec<u8>>,
    }

    #[test]
    fn go_style_values() {
        let json = r#"{
            "data": "AQID",
            "hash": "0A0B",
            "amount": "340282366920938463463374607431768211455",
            "timeout": "1m 30s",
            "signature": null,
            "nodes": null
        }"#;

        let sample: Sample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.data, vec![1, 2, 3]);
        assert_eq!(sample.hash, vec![0x0a, 0x0b]);
        assert_eq!(sample.amount, u128::MAX);
        assert_eq!(sample.timeout, Duration::from_secs(90));
        assert_eq!(sample.signature, None);
        assert!(sample.nodes.is_empty());

        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["hash"], "0A0B");
        assert_eq!(value["amount"], "340282366920938463463374607431768211455");
        assert_eq!(value["timeout"], "1m 30s");
    }

    #[test]
    fn null_bytes_are_empty() {
        #[derive(Deserialize)]
        struct Data {
            #[serde(with = "super::base64")]
            data: Vec<u8>,
        }

        let data: Data = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(data.data.is_empty());

        assert!(serde_json::from_str::<Data>(r#"{"data":"not base64!"}"#).is_err());
    }

    #[test]
    fn null_lists_are_empty() {
        #[derive(Debug, Default, PartialEq, Deserialize)]
        struct Item {
            #[serde(default, with = "super::null_default")]
            tags: Vec<String>,
        }

        #[derive(Deserialize)]
        struct List {
            #[serde(default, with = "super::null_default")]
            items: Vec<Item>,
        }

        let list: List = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(list.items.is_empty());

        let list: List = serde_json::from_str(r#"{}"#).unwrap();
        assert!(list.items.is_empty());

        let list: List = serde_json::from_str(r#"{"items":[{"tags":null},{"tags":["a"]}]}"#).unwrap();
        assert_eq!(list.items, vec![Item::default(), Item {
            tags: vec!["a".to_owned()]
        }]);

        assert!(serde_json::from_str::<List>(r#"{"items":{}}"#).is_err());
    }

    #[test]
    fn load_from_file() {
        #[derive(Debug, Deserialize)]
        struct Config {
            #[allow(unused)]
            url: String,
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{"url": 42}"#).unwrap();
        let err = load_json_from_file::<Config, _>(&path).unwrap_err();
        assert!(err.to_string().contains("url"), "{err}");

        std::fs::write(&path, r#"{"url": "http://localhost:26658"}"#).unwrap();
        load_json_from_file::<Config, _>(&path).unwrap();
    }
}
