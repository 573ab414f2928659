use std::fmt;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error when encoding or decoding an action payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadError {
    pub message: String,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload error: {}", self.message)
    }
}

impl std::error::Error for PayloadError {}

/// One named action as it was dispatched to a reducer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ActionRecord {
    pub action_name: String,
    #[serde(with = "payload_serde")]
    pub payload: Vec<u8>,
    pub sequence: u64,
    pub timestamp: SystemTime,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl ActionRecord {
    pub fn new(action_name: impl Into<String>, payload: Vec<u8>, sequence: u64) -> Self {
        ActionRecord {
            action_name: action_name.into(),
            payload,
            sequence,
            timestamp: SystemTime::now(),
        }
    }

    /// Encode `payload` with bitcode and wrap it in a record.
    pub fn encode<T: Serialize>(
        action_name: impl Into<String>,
        payload: &T,
        sequence: u64,
    ) -> Result<Self, PayloadError> {
        let bytes = bitcode::serialize(payload).map_err(|e| PayloadError {
            message: e.to_string(),
        })?;
        Ok(ActionRecord::new(action_name, bytes, sequence))
    }

    /// Deserialize the payload into the specified type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        bitcode::deserialize(&self.payload).map_err(|e| PayloadError {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let payload = bitcode::serialize(&(3u64, "page")).unwrap();
        let record = ActionRecord::new("Advance", payload.clone(), 1);
        assert_eq!(record.action_name, "Advance");
        assert_eq!(record.payload, payload);
        assert_eq!(record.sequence, 1);
    }

    #[test]
    fn encode_then_decode_payload() {
        let record = ActionRecord::encode("BeginFetch", &("hello", 42u64, true), 7).unwrap();
        assert_eq!(record.sequence, 7);
        let decoded: (String, u64, bool) = record.decode().unwrap();
        assert_eq!(decoded, ("hello".to_string(), 42, true));
    }

    #[test]
    fn decode_wrong_type_is_payload_error() {
        let record = ActionRecord::new("Advance", vec![0xff], 1);
        let result: Result<(String, String, String), _> = record.decode();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().starts_with("payload error"));
    }

    #[test]
    fn payload_is_base64_in_json() {
        let record = ActionRecord::new("EndFetch", vec![0xff, 0x00, 0xab], 2);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"payload\":\"/wCr\""));

        let back: ActionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload, vec![0xff, 0x00, 0xab]);
        assert_eq!(back.timestamp, record.timestamp);
    }

    #[test]
    fn debug() {
        let record = ActionRecord::new("Advance", vec![], 1);
        let debug_str = format!("{:?}", record);
        assert!(debug_str.contains("ActionRecord"));
        assert!(debug_str.contains("action_name: \"Advance\""));
        assert!(debug_str.contains("sequence: 1"));
    }
}
