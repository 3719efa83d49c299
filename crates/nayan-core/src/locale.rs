//! Feedback strings per language.
//!
//! Every user-facing message the page core produces comes from here, so the
//! announcement and toast code paths stay identical across languages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
}

#[derive(Debug)]
pub struct Messages {
    pub picker_on: &'static str,
    pub picker_off: &'static str,
    pub selected: &'static str,
    /// Prefix, followed by the combo.
    pub saved: &'static str,
    pub conflict: &'static str,
    pub clicked: &'static str,
    pub not_found: &'static str,
    pub lang_changed: &'static str,
    pub invalid_key: &'static str,
    pub deleted: &'static str,
    pub missing_id: &'static str,
    pub recording_cancelled: &'static str,
    pub extension_active: &'static str,
}

static EN: Messages = Messages {
    picker_on: "Picker Mode On. Click any button on the page.",
    picker_off: "Picker Mode Cancelled",
    selected: "Button selected. Now press your desired shortcut keys.",
    saved: "Key Saved: ",
    conflict: "Key already used for this site!",
    clicked: "Clicked",
    not_found: "Button not found on this page",
    lang_changed: "Language changed to English",
    invalid_key: "Please use letters or numbers only",
    deleted: "Shortcut Deleted",
    missing_id: "Enter ID first",
    recording_cancelled: "Recording cancelled",
    extension_active: "Nayan Deep Extension is active!",
};

static HI: Messages = Messages {
    picker_on: "पिकर मोड चालू। पेज पर किसी भी बटन पर क्लिक करें।",
    picker_off: "पिकर मोड रद्द किया गया",
    selected: "बटन चुना गया। अब अपनी पसंद की शॉर्टकट की (Key) दबाएं।",
    saved: "शॉर्टकट सहेजा गया: ",
    conflict: "यह की (Key) पहले से उपयोग में है!",
    clicked: "क्लिक किया",
    not_found: "इस पेज पर बटन नहीं मिला",
    lang_changed: "भाषा हिंदी में बदल दी गई",
    invalid_key: "कृपया केवल अक्षरों या अंकों का उपयोग करें।",
    deleted: "शॉर्टकट हटाया गया",
    missing_id: "पहले आईडी दर्ज करें",
    recording_cancelled: "रिकॉर्डिंग रद्द की गई",
    extension_active: "नयन दीप एक्सटेंशन सक्रिय है!",
};

static MR: Messages = Messages {
    picker_on: "पिकर मोड चालू. पेजवरील कोणत्याही बटणावर क्लिक करा.",
    picker_off: "पिकर मोड रद्द केला",
    selected: "बटन निवडले. आता तुमची शॉर्टकट की (Key) दाबा.",
    saved: "शॉर्टकट जतन झाला: ",
    conflict: "ही की (Key) आधीच वापरली आहे!",
    clicked: "क्लिक केले",
    not_found: "या पेजवर बटन सापडले नाही",
    lang_changed: "भाषा मराठीत बदलली",
    invalid_key: "कृपया फक्त अक्षरे किंवा अंक वापरा.",
    deleted: "शॉर्टकट हटवला",
    missing_id: "आधी आयडी टाका",
    recording_cancelled: "रेकॉर्डिंग रद्द केली",
    extension_active: "नयन दीप एक्सटेंशन सक्रिय आहे!",
};

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            "mr" => Some(Language::Mr),
            _ => None,
        }
    }

    /// Like [`Language::from_code`], falling back to English.
    pub fn resolve(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    /// Speech-synthesis locale.
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Mr => "mr-IN",
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::En => &EN,
            Language::Hi => &HI,
            Language::Mr => &MR,
        }
    }
}
