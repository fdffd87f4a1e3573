//! Closed set of gesture labels and the table that maps the recognizer's
//! raw category strings onto it.

use std::fmt;

/// A hand gesture as reported by the recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    /// The recognizer saw a hand but no known gesture.
    #[default]
    None,
    ClosedFist,
    OpenPalm,
    PointingUp,
    ThumbDown,
    ThumbUp,
    Victory,
    ILoveYou,
    /// A category string not in [`LABEL_TABLE`].
    Unknown,
}

/// Recognizer category name → label.
pub const LABEL_TABLE: [(&str, GestureLabel); 8] = [
    ("None",        GestureLabel::None),
    ("Closed_Fist", GestureLabel::ClosedFist),
    ("Open_Palm",   GestureLabel::OpenPalm),
    ("Pointing_Up", GestureLabel::PointingUp),
    ("Thumb_Down",  GestureLabel::ThumbDown),
    ("Thumb_Up",    GestureLabel::ThumbUp),
    ("Victory",     GestureLabel::Victory),
    ("ILoveYou",    GestureLabel::ILoveYou),
];

impl GestureLabel {
    /// Map a raw recognizer string.  Never fails: anything unrecognised
    /// becomes [`GestureLabel::Unknown`].  An empty string means the
    /// recognizer produced no category at all and maps to `None`.
    pub fn from_detector(raw: &str) -> Self {
        if raw.is_empty() {
            return GestureLabel::None;
        }
        LABEL_TABLE
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|&(_, label)| label)
            .unwrap_or_else(|| {
                log::trace!("unrecognised gesture category {:?}", raw);
                GestureLabel::Unknown
            })
    }

    /// The recognizer's spelling, or `"Unknown"`.
    pub fn as_str(&self) -> &'static str {
        LABEL_TABLE
            .iter()
            .find(|(_, label)| label == self)
            .map(|&(name, _)| name)
            .unwrap_or("Unknown")
    }

    /// Thumb gestures share a silhouette with a fist and are excluded from
    /// the curled-fingers click heuristic.
    pub fn is_thumb(&self) -> bool {
        matches!(self, GestureLabel::ThumbUp | GestureLabel::ThumbDown)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_round_trips() {
        for (name, label) in LABEL_TABLE {
            assert_eq!(GestureLabel::from_detector(name), label);
            assert_eq!(label.as_str(), name);
        }
    }

    #[test]
    fn unknown_strings_do_not_alias_known_labels() {
        assert_eq!(GestureLabel::from_detector("pointing_up"), GestureLabel::Unknown);
        assert_eq!(GestureLabel::from_detector("Wave"), GestureLabel::Unknown);
        assert_eq!(GestureLabel::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn empty_category_is_none() {
        assert_eq!(GestureLabel::from_detector(""), GestureLabel::None);
    }

    #[test]
    fn thumbs() {
        assert!(GestureLabel::ThumbUp.is_thumb());
        assert!(GestureLabel::ThumbDown.is_thumb());
        assert!(!GestureLabel::ClosedFist.is_thumb());
    }
}
