use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A generated content idea returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    /// Short scenario title.
    pub scenario: String,

    /// Why this scenario was picked: target user, situation, motivation.
    pub reason: String,

    /// Hashtags suggested for posts built on this scenario.
    pub hashtags: Vec<String>,

    /// Authoring hints, in the order the service sent them.
    pub content_guidance: ContentGuidance,
}

/// A single guidance value: either prose or a list of points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GuidanceValue {
    Text(String),
    List(Vec<String>),
}

/// Ordered guidance entries (`main_theme`, `hook`, `key_points`, ...).
///
/// Deserialized through a map visitor so entries keep their wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentGuidance(Vec<(String, GuidanceValue)>);

impl ContentGuidance {
    pub fn new(entries: Vec<(String, GuidanceValue)>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &GuidanceValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&GuidanceValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for ContentGuidance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GuidanceVisitor;

        impl<'de> Visitor<'de> for GuidanceVisitor {
            type Value = ContentGuidance;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of guidance entries with string or string-list values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, GuidanceValue>()? {
                    entries.push((key, value));
                }
                Ok(ContentGuidance(entries))
            }
        }

        deserializer.deserialize_map(GuidanceVisitor)
    }
}

impl Serialize for ContentGuidance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Human-readable label for a guidance key: `call_to_action` → `Call To Action`.
pub fn guidance_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// How often a hashtag occurs. Sent by the service as `[name, count]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u64)", into = "(String, u64)")]
pub struct HashtagFrequency {
    pub name: String,
    pub count: u64,
}

impl HashtagFrequency {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl From<(String, u64)> for HashtagFrequency {
    fn from((name, count): (String, u64)) -> Self {
        Self { name, count }
    }
}

impl From<HashtagFrequency> for (String, u64) {
    fn from(freq: HashtagFrequency) -> Self {
        (freq.name, freq.count)
    }
}

/// Body of a successful `/generate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub scenarios: Vec<ScenarioRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_hashtags: Option<Vec<HashtagFrequency>>,
}

impl GenerateResponse {
    /// Decode and validate a response body.
    pub fn from_json(body: &[u8]) -> crate::error::Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| crate::error::ScenegenError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r##"{
        "scenarios": [{
            "scenario": "Desk workers unwinding after overtime",
            "reason": "Office staff with neck pain look for quick relief.",
            "hashtags": ["#neckmassager", "#StressRelief", "#Wellness", "#SelfCare"],
            "content_guidance": {
                "main_theme": "Ten minutes back to yourself",
                "hook": "POV: it's 9pm and you're still at your desk",
                "key_points": ["Portable", "Heat mode", "Quiet motor"],
                "visuals": "Dim office, warm lamp",
                "call_to_action": "Tap the link before the sale ends"
            },
            "confidence_score": 8
        }],
        "top_hashtags": [["#Wellness", 4], ["#SelfCare", 2]]
    }"##;

    #[test]
    fn decodes_full_response() {
        let resp = GenerateResponse::from_json(BODY.as_bytes()).unwrap();
        assert_eq!(resp.scenarios.len(), 1);
        let s = &resp.scenarios[0];
        assert_eq!(s.hashtags.len(), 4);
        assert_eq!(
            resp.top_hashtags,
            Some(vec![
                HashtagFrequency::new("#Wellness", 4),
                HashtagFrequency::new("#SelfCare", 2),
            ])
        );
        assert_eq!(
            s.content_guidance.get("key_points"),
            Some(&GuidanceValue::List(vec![
                "Portable".into(),
                "Heat mode".into(),
                "Quiet motor".into()
            ]))
        );
    }

    #[test]
    fn guidance_keeps_wire_order() {
        let resp = GenerateResponse::from_json(BODY.as_bytes()).unwrap();
        let keys: Vec<&str> = resp.scenarios[0]
            .content_guidance
            .entries()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["main_theme", "hook", "key_points", "visuals", "call_to_action"]
        );
    }

    #[test]
    fn top_hashtags_is_optional() {
        let resp = GenerateResponse::from_json(br#"{"scenarios": []}"#).unwrap();
        assert!(resp.scenarios.is_empty());
        assert!(resp.top_hashtags.is_none());
    }

    #[test]
    fn missing_scenario_field_is_invalid_response() {
        let body = br##"{"scenarios": [{"scenario": "x", "hashtags": [], "content_guidance": {}}]}"##;
        let err = GenerateResponse::from_json(body).unwrap_err();
        assert!(matches!(err, crate::ScenegenError::InvalidResponse(_)));
        assert!(err.to_string().contains("reason"));
    }

    #[test]
    fn nested_guidance_value_is_rejected() {
        let body = br##"{"scenarios": [{"scenario": "x", "reason": "y", "hashtags": [],
            "content_guidance": {"hook": {"nested": true}}}]}"##;
        assert!(GenerateResponse::from_json(body).is_err());
    }

    #[test]
    fn malformed_frequency_pair_is_rejected() {
        let body = br##"{"scenarios": [], "top_hashtags": [["#a"]]}"##;
        assert!(GenerateResponse::from_json(body).is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let resp = GenerateResponse::from_json(BODY.as_bytes()).unwrap();
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["top_hashtags"][0][0], "#Wellness");
        assert_eq!(value["top_hashtags"][0][1], 4);
        assert_eq!(value["scenarios"][0]["content_guidance"]["hook"], "POV: it's 9pm and you're still at your desk");
    }

    #[test]
    fn labels_guidance_keys() {
        assert_eq!(guidance_label("main_theme"), "Main Theme");
        assert_eq!(guidance_label("call_to_action"), "Call To Action");
        assert_eq!(guidance_label("hook"), "Hook");
        assert_eq!(guidance_label("_odd__key_"), "Odd Key");
    }
}
