//! 时间戳反序列化
//!
//! 后端返回的 `date_generated` 通常是不带时区的 ISO 字符串，
//! 但也可能带 `Z` 或偏移量，这里统一转换为 UTC 的 `NaiveDateTime`。

use chrono::{DateTime, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

/// 解析 ISO-8601 时间字符串
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// 可选时间戳的反序列化函数，允许 `null`
pub fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = Option<NaiveDateTime>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an ISO-8601 timestamp string or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_timestamp(value)
                .map(Some)
                .ok_or_else(|| E::custom(format!("invalid timestamp: {}", value)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(TimestampVisitor)
        }
    }

    deserializer.deserialize_option(TimestampVisitor)
}
