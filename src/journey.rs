use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionType {
    Happy,
    Excited,
    Confused,
    Satisfied,
    Loved,
    Neutral,
    Frustrated,
}

impl EmotionType {
    pub const ALL: [EmotionType; 7] = [
        EmotionType::Happy,
        EmotionType::Excited,
        EmotionType::Confused,
        EmotionType::Satisfied,
        EmotionType::Loved,
        EmotionType::Neutral,
        EmotionType::Frustrated,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            EmotionType::Happy => "\u{1F60A}",
            EmotionType::Excited => "\u{1F929}",
            EmotionType::Confused => "\u{1F914}",
            EmotionType::Satisfied => "\u{1F60D}",
            EmotionType::Loved => "\u{1F970}",
            EmotionType::Neutral => "\u{1F610}",
            EmotionType::Frustrated => "\u{1F623}",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmotionType::Happy => "Happy",
            EmotionType::Excited => "Excited",
            EmotionType::Confused => "Confused",
            EmotionType::Satisfied => "Satisfied",
            EmotionType::Loved => "Loved",
            EmotionType::Neutral => "Neutral",
            EmotionType::Frustrated => "Frustrated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchpointType {
    Email,
    Phone,
    Social,
    Web,
    Chat,
    Store,
    Issue,
    Default,
}

impl TouchpointType {
    pub const ALL: [TouchpointType; 8] = [
        TouchpointType::Email,
        TouchpointType::Phone,
        TouchpointType::Social,
        TouchpointType::Web,
        TouchpointType::Chat,
        TouchpointType::Store,
        TouchpointType::Issue,
        TouchpointType::Default,
    ];

    pub fn icon(self) -> TouchpointIcon {
        match self {
            TouchpointType::Email => TouchpointIcon::Mail,
            TouchpointType::Phone => TouchpointIcon::Phone,
            TouchpointType::Social => TouchpointIcon::People,
            TouchpointType::Web => TouchpointIcon::Globe,
            TouchpointType::Chat => TouchpointIcon::SpeechBubble,
            TouchpointType::Store => TouchpointIcon::Storefront,
            TouchpointType::Issue => TouchpointIcon::AlertTriangle,
            TouchpointType::Default => TouchpointIcon::CheckCircle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchpointIcon {
    Mail,
    Phone,
    People,
    Globe,
    SpeechBubble,
    Storefront,
    AlertTriangle,
    CheckCircle,
}

impl TouchpointIcon {
    pub fn identifier(self) -> &'static str {
        match self {
            TouchpointIcon::Mail => "mail",
            TouchpointIcon::Phone => "phone",
            TouchpointIcon::People => "people",
            TouchpointIcon::Globe => "globe",
            TouchpointIcon::SpeechBubble => "speech-bubble",
            TouchpointIcon::Storefront => "storefront",
            TouchpointIcon::AlertTriangle => "alert-triangle",
            TouchpointIcon::CheckCircle => "check-circle",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            TouchpointIcon::Mail => "\u{2709}",
            TouchpointIcon::Phone => "\u{2706}",
            TouchpointIcon::People => "\u{1F465}",
            TouchpointIcon::Globe => "\u{1F310}",
            TouchpointIcon::SpeechBubble => "\u{1F4AC}",
            TouchpointIcon::Storefront => "\u{1F3EC}",
            TouchpointIcon::AlertTriangle => "\u{26A0}",
            TouchpointIcon::CheckCircle => "\u{2713}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchpointStatus {
    Success,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    Warning,
    Social,
    Chat,
    Standard,
}

impl StyleClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleClass::Warning => "warning",
            StyleClass::Social => "social",
            StyleClass::Chat => "chat",
            StyleClass::Standard => "standard",
        }
    }

    pub fn icon_color(self) -> &'static str {
        match self {
            StyleClass::Warning => "#ef4444",
            StyleClass::Social => "#2563eb",
            StyleClass::Chat => "#0284c7",
            StyleClass::Standard => "#0d9488",
        }
    }

    pub fn bubble_fill(self) -> &'static str {
        match self {
            StyleClass::Warning => "#fef2f2",
            StyleClass::Social => "#eff6ff",
            StyleClass::Chat => "#f0f9ff",
            StyleClass::Standard => "#f0fdfa",
        }
    }

    pub fn bubble_stroke(self) -> &'static str {
        match self {
            StyleClass::Warning => "#fecaca",
            StyleClass::Social => "#bfdbfe",
            StyleClass::Chat => "#bae6fd",
            StyleClass::Standard => "#99f6e4",
        }
    }

    pub fn title_color(self) -> &'static str {
        match self {
            StyleClass::Warning => "#dc2626",
            StyleClass::Social | StyleClass::Chat | StyleClass::Standard => "#334155",
        }
    }

    pub fn description_color(self) -> &'static str {
        match self {
            StyleClass::Warning => "#f87171",
            StyleClass::Social | StyleClass::Chat | StyleClass::Standard => "#94a3b8",
        }
    }
}

pub fn style_class(status: TouchpointStatus, kind: TouchpointType) -> StyleClass {
    match status {
        TouchpointStatus::Warning => StyleClass::Warning,
        TouchpointStatus::Success | TouchpointStatus::Neutral => match kind {
            TouchpointType::Social => StyleClass::Social,
            TouchpointType::Chat => StyleClass::Chat,
            TouchpointType::Email
            | TouchpointType::Phone
            | TouchpointType::Web
            | TouchpointType::Store
            | TouchpointType::Issue
            | TouchpointType::Default => StyleClass::Standard,
        },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Touchpoint {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TouchpointType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TouchpointStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Touchpoint {
    pub fn style_class(&self) -> StyleClass {
        style_class(self.status, self.kind)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyStage {
    pub id: String,
    pub order: u32,
    pub name: String,
    pub date: String,
    pub emotion: EmotionType,
    #[serde(default)]
    pub touchpoints: Vec<Touchpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Avatar {
    Remote {
        url: String,
    },
    Inline {
        mime_type: String,
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
    },
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar: Avatar,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub customer: CustomerProfile,
    stages: Vec<JourneyStage>,
}

impl Journey {
    pub fn new(customer: CustomerProfile, mut stages: Vec<JourneyStage>) -> Self {
        stages.sort_by_key(|stage| stage.order);
        Self { customer, stages }
    }

    pub fn stages(&self) -> &[JourneyStage] {
        &self.stages
    }

    pub fn from_json(input: &str) -> Result<Self> {
        let raw: Journey =
            serde_json::from_str(input).context("failed to parse journey definition")?;
        if raw.customer.name.trim().is_empty() {
            bail!("journey customer must have a non-empty name");
        }
        Ok(Journey::new(raw.customer, raw.stages))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize journey definition")
    }

    pub fn sample() -> Self {
        let customer = CustomerProfile {
            id: "c1".to_string(),
            name: "TRAN LY LY".to_string(),
            role: "Potential Customer".to_string(),
            avatar: Avatar::Remote {
                url: "https://picsum.photos/id/64/200/200".to_string(),
            },
            status: "SATISFIED".to_string(),
        };

        let stages = vec![
            JourneyStage {
                id: "s1".to_string(),
                order: 1,
                name: "AWARENESS".to_string(),
                date: "Dec 29".to_string(),
                emotion: EmotionType::Satisfied,
                touchpoints: vec![
                    touchpoint(
                        "t1-1",
                        TouchpointType::Default,
                        "Advertising",
                        Some("Anniversary Campaign"),
                        TouchpointStatus::Success,
                    ),
                    touchpoint(
                        "t1-2",
                        TouchpointType::Phone,
                        "Phone Call",
                        Some("Design Consultation"),
                        TouchpointStatus::Success,
                    ),
                ],
            },
            JourneyStage {
                id: "s2".to_string(),
                order: 2,
                name: "CONSIDERATION".to_string(),
                date: "Dec 29 PM".to_string(),
                emotion: EmotionType::Confused,
                touchpoints: vec![
                    touchpoint(
                        "t2-1",
                        TouchpointType::Social,
                        "Social Feed",
                        Some("Read Reviews"),
                        TouchpointStatus::Success,
                    ),
                    touchpoint(
                        "t2-2",
                        TouchpointType::Issue,
                        "Issue",
                        Some("Info Overload"),
                        TouchpointStatus::Warning,
                    ),
                ],
            },
            JourneyStage {
                id: "s3".to_string(),
                order: 3,
                name: "DECISION".to_string(),
                date: "Dec 30".to_string(),
                emotion: EmotionType::Excited,
                touchpoints: vec![touchpoint(
                    "t3-1",
                    TouchpointType::Web,
                    "Web Order",
                    Some("5% Discount Applied"),
                    TouchpointStatus::Success,
                )],
            },
            JourneyStage {
                id: "s4".to_string(),
                order: 4,
                name: "DELIVERY".to_string(),
                date: "Dec 31".to_string(),
                emotion: EmotionType::Happy,
                touchpoints: vec![
                    touchpoint(
                        "t4-1",
                        TouchpointType::Chat,
                        "Chat Contact",
                        Some("Shipping Confirmation"),
                        TouchpointStatus::Success,
                    ),
                    touchpoint(
                        "t4-2",
                        TouchpointType::Default,
                        "Received",
                        Some("On Time"),
                        TouchpointStatus::Success,
                    ),
                ],
            },
            JourneyStage {
                id: "s5".to_string(),
                order: 5,
                name: "LOYALTY".to_string(),
                date: "Jan 15".to_string(),
                emotion: EmotionType::Loved,
                touchpoints: vec![
                    touchpoint(
                        "t5-1",
                        TouchpointType::Store,
                        "Store Visit",
                        Some("Jewelry Browsing"),
                        TouchpointStatus::Success,
                    ),
                    touchpoint(
                        "t5-2",
                        TouchpointType::Default,
                        "New Purchase",
                        Some("Upsell Successful"),
                        TouchpointStatus::Success,
                    ),
                ],
            },
        ];

        Journey::new(customer, stages)
    }
}

fn touchpoint(
    id: &str,
    kind: TouchpointType,
    title: &str,
    description: Option<&str>,
    status: TouchpointStatus,
) -> Touchpoint {
    Touchpoint {
        id: id.to_string(),
        kind,
        title: title.to_string(),
        description: description.map(str::to_string),
        status,
        timestamp: None,
    }
}
