//! Prompt construction for the symptom summariser.
//!
//! The summariser itself is an outbound port; this module only turns a
//! selected medical tradition and a list of log entries into the text sent
//! to the chat-completion model.

use serde::Deserialize;

/// Medical tradition used to frame the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedicalTradition {
    Ayurveda,
    Naturopathy,
    TraditionalChineseMedicine,
    /// Anything else; the label is kept for the role statement.
    Other(String),
}

impl MedicalTradition {
    /// Classify a client label, case-insensitively.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "ayurveda" => Self::Ayurveda,
            "naturopathy" => Self::Naturopathy,
            "traditional chinese medicine" => Self::TraditionalChineseMedicine,
            _ => Self::Other(label.trim().to_owned()),
        }
    }

    fn label(&self) -> &str {
        match self {
            Self::Ayurveda => "Ayurveda",
            Self::Naturopathy => "Naturopathy",
            Self::TraditionalChineseMedicine => "Traditional Chinese Medicine",
            Self::Other(label) => label,
        }
    }

    fn guidance(&self) -> &'static str {
        match self {
            Self::Ayurveda => AYURVEDA_GUIDANCE,
            Self::Naturopathy => NATUROPATHY_GUIDANCE,
            Self::TraditionalChineseMedicine => TCM_GUIDANCE,
            Self::Other(_) => GENERAL_GUIDANCE,
        }
    }
}

/// Log entry as submitted for summarising.
///
/// Fields are opaque strings; the client may send entries that were never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummaryEntry {
    #[serde(default, alias = "log_time")]
    pub log_time: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub notes: String,
}

const AYURVEDA_GUIDANCE: &str = "
Ayurveda emphasizes balance between the body's three doshas: Vata, Pitta, and Kapha.
- Consider how the logs reflect imbalances in these doshas (e.g., spicy food may aggravate Pitta, anxiety for Vata, depression for Kapha).
- Recommendations may include dietary changes such as avoiding hot and spicy foods for Pitta, grounding exercises for Vata, and avoiding heavy, cold foods for Kapha. Keep it related to their logs.
- Ayurvedic herbs relevant to the symptoms may be suggested, such as ashwagandha for stress or triphala for digestion.
- Consider the 20 quality gunas, the time of day, and the season for additional correlations.
";

const NATUROPATHY_GUIDANCE: &str = "
Naturopathy focuses on the body's natural ability to heal.
- Consider if the logs indicate lifestyle or dietary choices that might be contributing to the symptoms.
- Recommendations may include emphasizing whole, organic foods, detoxifying the body, and reducing exposure to toxins or stress.
- Supplements relevant to the symptoms, such as probiotics for gut health or vitamin D for mood, may be suggested.
";

const TCM_GUIDANCE: &str = "
Traditional Chinese Medicine (TCM) emphasizes balance in Qi (energy flow) and the role of yin and yang.
- Look for patterns that may indicate Qi stagnation, heat, or dampness in the logs (e.g., feeling sluggish might indicate dampness, while hot weather or spicy food could indicate excess heat).
- Recommendations may include dietary modifications like cooling foods (e.g., cucumber, mint) to balance excess heat, or warming herbs for cold conditions.
- Acupuncture or herbal remedies like ginseng or licorice root may also be suggested.
";

const GENERAL_GUIDANCE: &str = "
No specific medical approach was selected. Provide general wellness advice such as maintaining a balanced diet, regular physical activity, and stress management techniques like mindfulness or yoga.
";

const RESPONSE_FORMAT: &str = "
The response **must** be structured exactly as follows and should not include any other tags like <div>:
- Patterns observed:
  - [Patterns]
- Recommendations:
  - [Recommendations]
- Holistic Techniques:
  - [Techniques]

Make sure the response includes these sections as bullet points only, with no additional HTML tags. Each section should have one or more items formatted with a hyphen (-) and text.

End the response with the following text in a new paragraph:

It's always advisable to discuss these observations and recommendations with your healthcare provider before adopting any changes. Your healthcare provider can best guide you based on your constitution and specific health circumstances.

";

const FOOD_KEYWORDS: &[&str] = &[
    "food",
    "ate",
    "meal",
    "dinner",
    "lunch",
    "breakfast",
    "spicy",
    "fried",
    "sweet",
    "dairy",
    "coffee",
    "alcohol",
    "sour",
    "bitter",
    "salty",
    "microwave",
    "oven",
    "takeout",
    "fast",
    "snack",
    "processed",
];

const ACTIVITY_KEYWORDS: &[&str] = &[
    "exercise",
    "sleep",
    "rest",
    "stress",
    "walking",
    "lying down",
    "work",
    "study",
    "meditation",
    "yoga",
    "running",
    "swimming",
    "cycling",
    "weightlifting",
    "dancing",
    "hiking",
    "climbing",
    "stretching",
    "pilates",
    "aerobics",
    "zumba",
];

const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "weather",
    "humidity",
    "temperature",
    "hot",
    "cold",
    "rainy",
    "dry",
    "pollen",
    "dust",
    "smoke",
    "allergen",
    "mold",
    "pet",
    "animal",
    "insect",
    "pest",
    "chemical",
    "cleaning",
];

const CATEGORIES: &[(&str, &[&str])] = &[
    ("Food", FOOD_KEYWORDS),
    ("Activity", ACTIVITY_KEYWORDS),
    ("Environment", ENVIRONMENT_KEYWORDS),
];

/// Tag free-text notes with the keyword categories they mention.
///
/// Matching is a case-insensitive substring test, so "ate" also matches
/// "late". Categories appear in a fixed order and only when they matched.
pub fn preprocess_notes(notes: &str) -> String {
    let lowered = notes.to_lowercase();
    let mut summary = String::from("Detected Categories:\n");
    for (category, keywords) in CATEGORIES {
        let matches: Vec<&str> = keywords
            .iter()
            .copied()
            .filter(|keyword| lowered.contains(keyword))
            .collect();
        if !matches.is_empty() {
            summary.push_str(&format!("- {category}: [{}]\n", matches.join(" ")));
        }
    }
    summary
}

/// Build the full chat prompt for `tradition` over `logs`.
pub fn build_prompt(tradition: &MedicalTradition, logs: &[LogSummaryEntry]) -> String {
    let mut prompt = format!(
        "You are a professional pattern tracker. Based on the following symptom logs and using \
         knowledge from {}, provide insights and recommendations for me to discuss with my \
         primary healthcare provider.\n\n",
        tradition.label()
    );
    for (index, log) in logs.iter().enumerate() {
        prompt.push_str(&format!(
            "Log #{}:\n- Time: {}\n- Severity: {}\n- Symptoms: {}\n- Notes: {}\n- Structured Notes: {}\n\n",
            index + 1,
            log.log_time,
            log.severity,
            log.symptoms,
            log.notes,
            preprocess_notes(&log.notes),
        ));
    }
    prompt.push_str(tradition.guidance());
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}
